use wb_dialogue::SessionStatus;

use super::Context;

pub async fn run(
    ctx: &Context,
    status: Option<SessionStatus>,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let sessions = ctx.client.list_sessions(status, limit).await?;

    for session in &sessions {
        println!(
            "{}\t{}\t{}\t{}",
            session.session_id,
            session.status,
            session.updated_at.as_deref().unwrap_or("-"),
            session
                .user_input
                .as_deref()
                .map(|input| input.chars().take(40).collect::<String>())
                .unwrap_or_default()
        );
    }
    if sessions.is_empty() {
        println!("no sessions");
    }
    Ok(())
}
