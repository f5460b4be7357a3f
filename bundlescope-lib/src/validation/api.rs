use super::FindingType;

/// Reporting surface handed to rules.
pub trait Api {
    /// Record a finding. `filename` defaults to the unknown file when absent.
    fn report(&mut self, kind: FindingType, message: &str, filename: Option<&str>);

    fn error(&mut self, message: &str, filename: Option<&str>) {
        self.report(FindingType::Error, message, filename);
    }

    fn warn(&mut self, message: &str, filename: Option<&str>) {
        self.report(FindingType::Warn, message, filename);
    }

    fn info(&mut self, message: &str, filename: Option<&str>) {
        self.report(FindingType::Info, message, filename);
    }
}
