//! Auth command handlers: authorize and forget the stored Google token.

use anyhow::Result;
use playlist_core::auth::Session;
use playlist_core::i18n::MessageKey;

use crate::app::context::RunContext;

pub(crate) async fn run_auth_login_command(ctx: &RunContext) -> Result<()> {
    let m = ctx.messages;
    let http = ctx.http_client()?;
    let credentials = ctx.credentials();
    Session::login(&credentials, &http, move |url| {
        eprintln!("{}", m.text(MessageKey::AuthAttempt));
        eprintln!("{url}");
    })
    .await?;

    ctx.say(&m.render(
        MessageKey::AuthSuccess,
        &[("path", &ctx.settings.token_file.display())],
    ));
    Ok(())
}

pub(crate) fn run_auth_logout_command(ctx: &RunContext) -> Result<()> {
    let m = &ctx.messages;
    let path = ctx.settings.token_file.display();
    if Session::logout(&ctx.credentials())? {
        ctx.say(&m.render(MessageKey::LoggedOut, &[("path", &path)]));
    } else {
        ctx.say(&m.render(MessageKey::NotLoggedIn, &[("path", &path)]));
    }
    Ok(())
}
