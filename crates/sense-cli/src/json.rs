//! Line-delimited JSON loop for driving a session from a chat panel.

use sense_session::{PanelReply, PanelRequest, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Answer one panel request.
pub async fn handle_line(session: &mut Session, line: &str) -> PanelReply {
    let request = match PanelRequest::decode(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid panel request");
            return PanelReply::Error {
                message: e.to_string(),
            };
        }
    };

    match &request {
        PanelRequest::ClearHistory => {
            session.clear();
            PanelReply::Cleared
        }
        PanelRequest::UserMessage { text, .. } => {
            let editor = request.editor_state();
            session.handle_message(text, &editor).await.into()
        }
    }
}

/// Read requests from stdin and write replies to stdout until EOF.
pub async fn run(mut session: Session) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!(len = line.len(), "Panel request received");
        let reply = handle_line(&mut session, &line).await;
        println!("{}", reply.encode()?);
    }

    session.end();
    Ok(())
}
