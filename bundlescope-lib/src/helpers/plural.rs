use super::js_number;

/// English plural: the first word for exactly one, the second otherwise.
#[must_use]
pub fn plural(value: f64, words: &[String]) -> String {
    let index = usize::from((value - 1.0).abs() > f64::EPSILON);
    pick(words, index)
}

#[must_use]
pub fn plural_with_value(value: f64, words: &[String]) -> String {
    format!("{} {}", js_number(value), plural(value, words))
}

/// Russian plural with the usual three forms (one, few, many).
#[must_use]
pub fn plural_rus(value: f64, words: &[String]) -> String {
    #[expect(clippy::cast_possible_truncation, reason = "only the last two digits matter")]
    let n = (value.abs().trunc() % 100.0) as u8;
    let has_fraction = value.fract() != 0.0;

    let index = if has_fraction {
        1
    } else if n % 10 == 1 && n != 11 {
        0
    } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&n) {
        1
    } else {
        2
    };

    pick(words, index)
}

#[must_use]
pub fn plural_with_value_rus(value: f64, words: &[String]) -> String {
    format!("{} {}", js_number(value), plural_rus(value, words))
}

fn pick(words: &[String], index: usize) -> String {
    words.get(index).or_else(|| words.last()).cloned().unwrap_or_default()
}
