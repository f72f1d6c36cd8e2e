use crate::model::TimerChoice;
use std::time::Duration;

/// Maps a timer choice to its exact countdown length. Unrecognized labels
/// never reach this point; [`TimerChoice::parse`] rejects them up front.
pub fn countdown_duration(choice: TimerChoice) -> Duration {
    Duration::from_secs(choice.minutes() * 60)
}

#[cfg(test)]
mod tests {
    use super::countdown_duration;
    use crate::model::TimerChoice;
    use std::time::Duration;

    #[test]
    fn each_choice_maps_to_its_exact_duration() {
        assert_eq!(
            countdown_duration(TimerChoice::Min10),
            Duration::from_secs(600)
        );
        assert_eq!(
            countdown_duration(TimerChoice::Min15),
            Duration::from_secs(900)
        );
        assert_eq!(
            countdown_duration(TimerChoice::Min20),
            Duration::from_secs(1200)
        );
        assert_eq!(
            countdown_duration(TimerChoice::Min30),
            Duration::from_secs(1800)
        );
    }
}
