//! One-shot dry run: print the current state and the plan, change nothing.

use autoshare_core::{Config, plan};
use autoshare_xapi::XapiSession;

use crate::collect::collect;
use crate::reconcile::render_set;

pub async fn cmd_check(host: &str, config: &Config) -> anyhow::Result<()> {
    let (session, _feedback) = XapiSession::connect(host)?;
    let snapshot = collect(&session).await?;
    let decided = plan(config, &snapshot);

    println!("active:   {}", render_set(&snapshot.active));
    println!("signaled: {}", render_set(&snapshot.signaled));
    println!("plan:     {decided}");
    Ok(())
}
