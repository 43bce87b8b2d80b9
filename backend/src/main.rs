use moon::*;
use shared::{DownMsg, UpMsg};

async fn frontend() -> Frontend {
    Frontend::new().title("GraphCalc").index_by_robots(false)
}

// The calculator talks REST to external services directly; the only traffic
// arriving here is the dev tooling's liveness ping.
async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);
    match &req.up_msg {
        UpMsg::Ping => {
            if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
                session.send_down_msg(&DownMsg::Pong, cor_id).await;
            }
        }
    }
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    start(frontend, up_msg_handler, |_| {}).await
}
