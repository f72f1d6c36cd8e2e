use crate::gateway::{Gateway, Inbound};
use std::collections::HashMap;
use std::sync::Arc;
use taskbot_core::engine::Engine;
use taskbot_core::session::Reply;
use taskbot_core::timer::countdown_duration;
use tokio::sync::{Mutex, mpsc};

/// Routes inbound messages to one worker per chat, so one chat's countdown
/// never blocks another chat. The per-chat queues are unbounded so the
/// dispatcher never parks behind a worker that is mid-countdown; queue depth
/// is bounded in practice by how fast one user can type. Returns once the
/// inbound stream ends and every worker has drained its queue.
pub async fn run(
    engine: Arc<Mutex<Engine>>,
    gateway: Arc<dyn Gateway>,
    mut inbound: mpsc::Receiver<Inbound>,
) {
    let mut chats: HashMap<i64, mpsc::UnboundedSender<String>> = HashMap::new();
    let mut workers = Vec::new();

    while let Some(message) = inbound.recv().await {
        let sender = chats.entry(message.chat_id).or_insert_with(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            workers.push(tokio::spawn(chat_worker(
                message.chat_id,
                rx,
                engine.clone(),
                gateway.clone(),
            )));
            tx
        });

        if sender.send(message.text).is_err() {
            tracing::warn!(chat_id = message.chat_id, "chat worker gone, dropping message");
        }
    }

    drop(chats);
    for worker in workers {
        let _ = worker.await;
    }
}

/// Processes one chat strictly in order. The engine lock is held only for a
/// single synchronous step, never across the countdown sleep.
async fn chat_worker(
    chat_id: i64,
    mut messages: mpsc::UnboundedReceiver<String>,
    engine: Arc<Mutex<Engine>>,
    gateway: Arc<dyn Gateway>,
) {
    while let Some(text) = messages.recv().await {
        let outcome = engine.lock().await.handle_text(chat_id, &text);
        deliver(gateway.as_ref(), chat_id, &outcome.replies);

        if let Some(choice) = outcome.countdown {
            tracing::info!(chat_id, timer = choice.label(), "countdown started");
            tokio::time::sleep(countdown_duration(choice)).await;

            let outcome = engine.lock().await.handle_timer_expired(chat_id);
            deliver(gateway.as_ref(), chat_id, &outcome.replies);
        }
    }
}

fn deliver(gateway: &dyn Gateway, chat_id: i64, replies: &[Reply]) {
    for reply in replies {
        if let Err(err) = gateway.send(chat_id, reply) {
            tracing::warn!(error = %err, chat_id, "failed to deliver reply");
        }
    }
}
