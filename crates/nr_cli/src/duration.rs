use std::str::FromStr;
use std::time::Duration;

/// Durations like `500ms`, `2s`, `1m30s`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_millis = 0u64;
        let mut current_number = String::new();
        let mut has_value = false;
        let mut chars = s.trim().chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let num: u64 = current_number
                .parse()
                .map_err(|_| format!("Expected a number before '{}'", c))?;
            let unit_millis = match c {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                's' => 1_000,
                'm' => 60_000,
                'h' => 3_600_000,
                'd' => 86_400_000,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_millis = total_millis.saturating_add(num.saturating_mul(unit_millis));
            current_number.clear();
            has_value = true;
        }

        if !current_number.is_empty() {
            let num: u64 = current_number
                .parse()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_millis = total_millis.saturating_add(num.saturating_mul(1_000));
            has_value = true;
        }

        if !has_value {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_millis(total_millis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Duration {
        s.parse::<HumanDuration>().unwrap().0
    }

    #[test]
    fn test_units() {
        assert_eq!(parse("500ms"), Duration::from_millis(500));
        assert_eq!(parse("2s"), Duration::from_secs(2));
        assert_eq!(parse("1m30s"), Duration::from_secs(90));
        assert_eq!(parse("1h 15m"), Duration::from_secs(4500));
        assert_eq!(parse("45"), Duration::from_secs(45));
        assert_eq!(parse("0ms"), Duration::ZERO);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<HumanDuration>().is_err());
        assert!("ms".parse::<HumanDuration>().is_err());
        assert!("3x".parse::<HumanDuration>().is_err());
    }
}
