use anyhow::{Context, Result, ensure};

use crate::context::TestContext;
use crate::ops::messages;
use crate::types::Listing;

/// Draft → send moves a message from drafts to the outbox.
pub async fn create_and_send_message(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let sender = ctx.create_user(&s, "sender").await?;
    let recipient = ctx.create_user(&s, "recipient").await?;

    s.switch_user(sender.clone()).await?;
    let res = messages::create(&s, sender.name(), recipient.name(), "internal").await?;
    ensure!(
        res.is_success(),
        "message create failed ({}): {}",
        res.status(),
        res.body()
    );
    let body = res.json().context("message create response is not JSON")?;
    let id = body["id"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("no message id in {body}"))?;

    let res = messages::get(&s, sender.name(), &id).await?;
    ensure!(res.status() == 200, "draft read failed ({})", res.status());
    let draft = res.json().context("draft is not JSON")?;
    ensure!(draft["sakai:messagebox"] == "drafts", "expected drafts box: {draft}");
    ensure!(draft["sakai:to"] == recipient.name(), "expected recipient: {draft}");

    let res = messages::send(&s, sender.name(), &id).await?;
    ensure!(res.status() == 200, "send failed ({}): {}", res.status(), res.body());

    let res = messages::get(&s, sender.name(), &id).await?;
    let sent = res.json().context("sent message is not JSON")?;
    ensure!(
        sent["sakai:messagebox"] == "outbox",
        "expected outbox after send: {sent}"
    );
    Ok(())
}

/// Box listings attribute one sent message to the right boxes on both sides.
pub async fn box_listings_count_messages(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let sender = ctx.create_user(&s, "box-sender").await?;
    let recipient = ctx.create_user(&s, "box-recipient").await?;

    s.switch_user(sender.clone()).await?;
    let res = messages::create(&s, sender.name(), recipient.name(), "internal").await?;
    let body = res.json().context("message create response is not JSON")?;
    let id = body["id"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("no message id in {body}"))?;
    let res = messages::send(&s, sender.name(), &id).await?;
    ensure!(res.status() == 200, "send failed ({})", res.status());

    let outbox: Listing = messages::list_box(&s, "outbox")
        .await?
        .json_as()
        .context("outbox listing is not JSON")?;
    ensure!(outbox.total == 1, "expected 1 in sender outbox, got {}", outbox.total);
    let inbox: Listing = messages::list_box(&s, "inbox")
        .await?
        .json_as()
        .context("inbox listing is not JSON")?;
    ensure!(inbox.total == 0, "expected empty sender inbox, got {}", inbox.total);

    s.switch_user(recipient).await?;
    let inbox: Listing = messages::list_box(&s, "inbox")
        .await?
        .json_as()
        .context("inbox listing is not JSON")?;
    ensure!(inbox.total == 1, "expected 1 in recipient inbox, got {}", inbox.total);
    let all: Listing = messages::list_all(&s)
        .await?
        .json_as()
        .context("all listing is not JSON")?;
    ensure!(all.total == 1, "expected 1 across recipient boxes, got {}", all.total);
    Ok(())
}
