use super::Context;

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    if ctx.client.health().await {
        println!("ok {}", ctx.client.base());
        Ok(())
    } else {
        anyhow::bail!("backend unreachable at {}", ctx.client.base())
    }
}
