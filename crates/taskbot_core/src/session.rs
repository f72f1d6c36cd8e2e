use crate::model::{Task, TimerChoice};
use crate::registry::Registry;

pub const CMD_ADD: &str = "todo";
pub const CMD_SET_TIMER: &str = "setime";
pub const CMD_START: &str = "start";
pub const CONFIRM_YES: &str = "yes";
pub const CONFIRM_NO: &str = "no";

/// Which input the session currently expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Idle,
    AwaitingTaskName,
    AwaitingTimer,
    SelectingTask,
    Running,
    AwaitingConfirmation,
}

/// Conversation-scoped state for a single chat. One per chat id, created on
/// first contact, alive for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub mode: InputMode,
    pub pending_name: Option<String>,
    pub pending_timer: Option<TimerChoice>,
    pub active_task: Option<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Text(&'a str),
    TimerExpired,
}

/// Reply-option set attached to an outbound prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOptions {
    None,
    TimerChoices,
    YesNo,
    TaskNames(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub options: ReplyOptions,
}

impl Reply {
    pub fn plain<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            options: ReplyOptions::None,
        }
    }

    pub fn with_options<T: Into<String>>(text: T, options: ReplyOptions) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// Persistence side effect requested by a step. The engine executes these;
/// the step itself never touches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Insert { name: String, timer: TimerChoice },
    Delete { name: String },
}

#[derive(Debug)]
pub struct Transition {
    pub session: Session,
    pub replies: Vec<Reply>,
    pub store_ops: Vec<StoreOp>,
    pub countdown: Option<TimerChoice>,
}

impl Transition {
    fn stay(session: Session) -> Self {
        Self {
            session,
            replies: Vec::new(),
            store_ops: Vec::new(),
            countdown: None,
        }
    }
}

/// True when the engine must refresh the registry before running this step,
/// so the step sees a current view of the store.
pub fn needs_refresh(session: &Session, event: &Event<'_>) -> bool {
    let Event::Text(text) = event else {
        return false;
    };
    let text = text.trim();

    match session.mode {
        InputMode::Idle | InputMode::SelectingTask => text == CMD_START,
        // Duplicate-name check at commit time needs fresh data.
        InputMode::AwaitingTimer => true,
        InputMode::AwaitingConfirmation => text == CONFIRM_YES,
        _ => false,
    }
}

/// One step of the state machine: pure in (session, event, registry view),
/// out (new session, replies, store ops, optional countdown request).
pub fn step(session: &Session, event: Event<'_>, registry: &Registry) -> Transition {
    match event {
        Event::TimerExpired => on_timer_expired(session),
        Event::Text(text) => on_text(session, text.trim(), registry),
    }
}

fn on_timer_expired(session: &Session) -> Transition {
    if session.mode != InputMode::Running {
        return Transition::stay(session.clone());
    }
    let Some(task) = session.active_task.as_ref() else {
        return Transition::stay(session.clone());
    };

    let mut next = session.clone();
    next.mode = InputMode::AwaitingConfirmation;
    Transition {
        session: next,
        replies: vec![Reply::with_options(
            format!("{} is over! Did you complete your task?", task.timer.label()),
            ReplyOptions::YesNo,
        )],
        store_ops: Vec::new(),
        countdown: None,
    }
}

fn on_text(session: &Session, text: &str, registry: &Registry) -> Transition {
    match session.mode {
        InputMode::Idle => on_idle(session, text, registry),
        InputMode::AwaitingTaskName => on_task_name(session, text),
        InputMode::AwaitingTimer => on_timer_choice(session, text, registry),
        InputMode::SelectingTask => on_task_selection(session, text, registry),
        // Messages arriving mid-countdown queue behind the sleep; anything
        // that still lands here is dropped.
        InputMode::Running => Transition::stay(session.clone()),
        InputMode::AwaitingConfirmation => on_confirmation(session, text, registry),
    }
}

fn on_idle(session: &Session, text: &str, registry: &Registry) -> Transition {
    match text {
        CMD_ADD => {
            let mut next = session.clone();
            next.mode = InputMode::AwaitingTaskName;
            Transition {
                session: next,
                replies: vec![Reply::plain("What task should I add to your list?")],
                store_ops: Vec::new(),
                countdown: None,
            }
        }
        CMD_SET_TIMER => {
            let mut next = session.clone();
            next.mode = InputMode::AwaitingTimer;
            Transition {
                session: next,
                replies: vec![timer_prompt()],
                store_ops: Vec::new(),
                countdown: None,
            }
        }
        CMD_START => present_selection(session, registry, "Which task do you want to start first?"),
        _ => Transition::stay(session.clone()),
    }
}

fn on_task_name(session: &Session, text: &str) -> Transition {
    if text.is_empty() {
        return Transition {
            session: session.clone(),
            replies: vec![Reply::plain(
                "A task name cannot be empty. What should I add?",
            )],
            store_ops: Vec::new(),
            countdown: None,
        };
    }

    let mut next = session.clone();
    next.mode = InputMode::Idle;
    next.pending_name = Some(text.to_string());
    Transition {
        session: next,
        replies: vec![Reply::plain(format!(
            "Got it: \"{text}\". Send {CMD_SET_TIMER} to pick a timer."
        ))],
        store_ops: Vec::new(),
        countdown: None,
    }
}

fn on_timer_choice(session: &Session, text: &str, registry: &Registry) -> Transition {
    // The prompt trigger itself is never treated as a duration choice.
    if text == CMD_SET_TIMER {
        return Transition {
            session: session.clone(),
            replies: vec![timer_prompt()],
            store_ops: Vec::new(),
            countdown: None,
        };
    }

    let Some(choice) = TimerChoice::parse(text) else {
        return Transition {
            session: session.clone(),
            replies: vec![Reply::with_options(
                format!("\"{text}\" is not one of the timer options. Please pick one."),
                ReplyOptions::TimerChoices,
            )],
            store_ops: Vec::new(),
            countdown: None,
        };
    };

    let Some(name) = session.pending_name.clone() else {
        let mut next = session.clone();
        next.mode = InputMode::Idle;
        return Transition {
            session: next,
            replies: vec![Reply::plain(format!(
                "I don't have a task name yet. Send {CMD_ADD} first."
            ))],
            store_ops: Vec::new(),
            countdown: None,
        };
    };

    // Names identify tasks, so a second pending task with the same name is
    // rejected here; the store layer stays dumb.
    if registry.lookup_timer(&name).is_some() {
        let mut next = session.clone();
        next.mode = InputMode::Idle;
        next.pending_name = None;
        next.pending_timer = None;
        return Transition {
            session: next,
            replies: vec![Reply::plain(format!(
                "You already have a pending task named \"{name}\". Send {CMD_ADD} to pick another name."
            ))],
            store_ops: Vec::new(),
            countdown: None,
        };
    }

    let mut next = session.clone();
    next.mode = InputMode::Idle;
    next.pending_name = None;
    next.pending_timer = None;
    Transition {
        session: next,
        replies: vec![Reply::plain(format!(
            "Saved task \"{name}\" with a {} timer. Send {CMD_START} when you are ready.",
            choice.label()
        ))],
        store_ops: vec![StoreOp::Insert {
            name,
            timer: choice,
        }],
        countdown: None,
    }
}

fn on_task_selection(session: &Session, text: &str, registry: &Registry) -> Transition {
    if text == CMD_START {
        return present_selection(session, registry, "Which task do you want to start first?");
    }

    let Some(task) = registry.find_task(text) else {
        // Neither a command nor a known task name: fall through.
        return Transition::stay(session.clone());
    };

    let mut next = session.clone();
    next.mode = InputMode::Running;
    next.active_task = Some(task.clone());
    Transition {
        session: next,
        replies: vec![Reply::plain(format!(
            "Please start your task: {}!!!\nStarting a {} timer.",
            task.name,
            task.timer.label()
        ))],
        store_ops: vec![StoreOp::Delete {
            name: task.name.clone(),
        }],
        countdown: Some(task.timer),
    }
}

fn on_confirmation(session: &Session, text: &str, registry: &Registry) -> Transition {
    match text {
        CONFIRM_YES => {
            let mut transition =
                present_selection(session, registry, "Which task do you want to start next?");
            transition.session.active_task = None;
            transition
                .replies
                .insert(0, Reply::plain("Good job! Keep going!!"));
            transition
        }
        CONFIRM_NO => Transition {
            session: session.clone(),
            replies: vec![Reply::with_options(
                "Oops! Waiting..... Did you complete your task?",
                ReplyOptions::YesNo,
            )],
            store_ops: Vec::new(),
            countdown: None,
        },
        _ => Transition::stay(session.clone()),
    }
}

fn present_selection(session: &Session, registry: &Registry, prompt: &str) -> Transition {
    let names = registry.selectable_names();
    let mut next = session.clone();

    if names.is_empty() {
        next.mode = InputMode::Idle;
        return Transition {
            session: next,
            replies: vec![Reply::plain(format!(
                "You have no pending tasks. Send {CMD_ADD} to add one."
            ))],
            store_ops: Vec::new(),
            countdown: None,
        };
    }

    next.mode = InputMode::SelectingTask;
    Transition {
        session: next,
        replies: vec![Reply::with_options(prompt, ReplyOptions::TaskNames(names))],
        store_ops: Vec::new(),
        countdown: None,
    }
}

fn timer_prompt() -> Reply {
    Reply::with_options(
        "Please set the timer for your task",
        ReplyOptions::TimerChoices,
    )
}
