use taskbot_core::error::AppError;
use taskbot_core::model::TIMER_CHOICES;
use taskbot_core::session::{Reply, ReplyOptions};

/// An inbound message from the transport, tagged with its chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: i64,
    pub text: String,
}

/// Outbound side of the messaging transport: deliver a prompt, with its
/// reply options rendered however the transport renders keyboards.
pub trait Gateway: Send + Sync {
    fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), AppError>;
}

/// Rows of selectable labels for a reply-option set. Timer choices come as
/// two rows of two, yes/no as a single row, task names one per row.
pub fn option_rows(options: &ReplyOptions) -> Vec<Vec<String>> {
    match options {
        ReplyOptions::None => Vec::new(),
        ReplyOptions::TimerChoices => TIMER_CHOICES
            .chunks(2)
            .map(|row| row.iter().map(|choice| choice.label().to_string()).collect())
            .collect(),
        ReplyOptions::YesNo => vec![vec!["yes".to_string(), "no".to_string()]],
        ReplyOptions::TaskNames(names) => {
            names.iter().map(|name| vec![name.clone()]).collect()
        }
    }
}

/// Stdout-backed gateway for a single console chat.
pub struct ConsoleGateway;

impl Gateway for ConsoleGateway {
    fn send(&self, _chat_id: i64, reply: &Reply) -> Result<(), AppError> {
        println!("{}", reply.text);
        for row in option_rows(&reply.options) {
            let rendered: Vec<String> = row.iter().map(|label| format!("[{label}]")).collect();
            println!("{}", rendered.join(" "));
        }
        Ok(())
    }
}
