use std::io::Write;

/// Where commands print their reports and how a failed validation ends the process.
///
/// The binary binds this to the process streams; tests capture everything in memory.
pub trait Host: Send + Sync {
    /// Stream for query results, diffs, and validation reports.
    fn output(&mut self) -> impl Write;

    /// Stream for load failures and the final validation verdict.
    fn error(&mut self) -> impl Write;

    /// Called with a non-zero code when validation finds errors.
    fn exit(&mut self, code: i32);
}

/// Host that keeps output and the requested exit code in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
