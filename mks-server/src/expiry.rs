use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Expiry windows offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryOption {
    #[default]
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
    OneWeek,
}

impl ExpiryOption {
    /// All options, shortest first
    pub const ALL: [ExpiryOption; 8] = [
        ExpiryOption::FiveMinutes,
        ExpiryOption::FifteenMinutes,
        ExpiryOption::ThirtyMinutes,
        ExpiryOption::OneHour,
        ExpiryOption::SixHours,
        ExpiryOption::TwelveHours,
        ExpiryOption::OneDay,
        ExpiryOption::OneWeek,
    ];

    /// Maps a form token to its option. Unknown tokens fall back to the
    /// shortest window.
    pub fn from_token(token: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|option| option.token() == token)
            .unwrap_or_default()
    }

    /// Form token, e.g. `"1day"`
    pub fn token(self) -> &'static str {
        match self {
            ExpiryOption::FiveMinutes => "5min",
            ExpiryOption::FifteenMinutes => "15min",
            ExpiryOption::ThirtyMinutes => "30min",
            ExpiryOption::OneHour => "1h",
            ExpiryOption::SixHours => "6h",
            ExpiryOption::TwelveHours => "12h",
            ExpiryOption::OneDay => "1day",
            ExpiryOption::OneWeek => "1week",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpiryOption::FiveMinutes => "5 minutes",
            ExpiryOption::FifteenMinutes => "15 minutes",
            ExpiryOption::ThirtyMinutes => "30 minutes",
            ExpiryOption::OneHour => "1 hour",
            ExpiryOption::SixHours => "6 hours",
            ExpiryOption::TwelveHours => "12 hours",
            ExpiryOption::OneDay => "1 day",
            ExpiryOption::OneWeek => "1 week",
        }
    }

    pub fn duration(self) -> Duration {
        let secs = match self {
            ExpiryOption::FiveMinutes => 5 * MINUTE,
            ExpiryOption::FifteenMinutes => 15 * MINUTE,
            ExpiryOption::ThirtyMinutes => 30 * MINUTE,
            ExpiryOption::OneHour => HOUR,
            ExpiryOption::SixHours => 6 * HOUR,
            ExpiryOption::TwelveHours => 12 * HOUR,
            ExpiryOption::OneDay => DAY,
            ExpiryOption::OneWeek => 7 * DAY,
        };
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table() {
        let expected = [
            ("5min", 5 * 60),
            ("15min", 15 * 60),
            ("30min", 30 * 60),
            ("1h", 3600),
            ("6h", 6 * 3600),
            ("12h", 12 * 3600),
            ("1day", 24 * 3600),
            ("1week", 168 * 3600),
        ];

        for (token, secs) in expected {
            let option = ExpiryOption::from_token(token);
            assert_eq!(option.token(), token);
            assert_eq!(option.duration(), Duration::from_secs(secs), "token {}", token);
        }
    }

    #[test]
    fn test_unknown_token_defaults_to_shortest() {
        for token in ["", "2h", "forever", "1DAY", " 1h"] {
            assert_eq!(ExpiryOption::from_token(token), ExpiryOption::FiveMinutes);
        }
        assert_eq!(ExpiryOption::from_token("nope").duration(), Duration::from_secs(300));
    }

    #[test]
    fn test_all_sorted_shortest_first() {
        let durations: Vec<Duration> = ExpiryOption::ALL.iter().map(|o| o.duration()).collect();
        let mut sorted = durations.clone();
        sorted.sort();
        assert_eq!(durations, sorted);
    }
}
