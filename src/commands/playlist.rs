//! Remote playlist management: create, delete, share.

use anyhow::{Context, Result};
use playlist_core::i18n::MessageKey;
use playlist_core::model::playlist_url;
use playlist_core::source::PlaylistRef;
use playlist_core::youtube::Privacy;
use tracing::info;

use crate::app::context::RunContext;
use crate::cli::{CreateArgs, PlaylistIdArgs};

pub(crate) async fn run_create_command(ctx: &RunContext, args: &CreateArgs) -> Result<()> {
    let m = &ctx.messages;
    ctx.say(&m.render(MessageKey::CreatingPlaylist, &[("name", &args.title)]));

    let privacy = if args.public {
        Privacy::Public
    } else {
        Privacy::Private
    };
    let (client, session) = ctx.youtube().await?;
    let playlist_id = client
        .create_playlist(&session, &args.title, &args.description, privacy)
        .await?;
    session.release().context("Failed to persist the refreshed token")?;
    info!(playlist_id = %playlist_id, privacy = privacy.as_str(), "playlist created");

    let url = playlist_url(&playlist_id);
    ctx.say(&m.render(
        MessageKey::PlaylistCreated,
        &[("playlist_name", &args.title), ("playlist_url", &url)],
    ));
    Ok(())
}

pub(crate) async fn run_delete_command(ctx: &RunContext, args: &PlaylistIdArgs) -> Result<()> {
    let m = &ctx.messages;
    let playlist = PlaylistRef::parse(&args.playlist)?;
    ctx.say(&m.render(MessageKey::DeletingPlaylist, &[("name", &args.playlist)]));

    let (client, session) = ctx.youtube().await?;
    client.delete_playlist(&session, playlist.id()).await?;
    session.release().context("Failed to persist the refreshed token")?;

    ctx.say(&m.render(
        MessageKey::PlaylistDeleted,
        &[("playlist_name", &args.playlist)],
    ));
    Ok(())
}

pub(crate) async fn run_share_command(ctx: &RunContext, args: &PlaylistIdArgs) -> Result<()> {
    let m = &ctx.messages;
    let playlist = PlaylistRef::parse(&args.playlist)?;
    ctx.say(&m.render(MessageKey::GettingUrl, &[("name", &args.playlist)]));

    let (client, session) = ctx.youtube().await?;
    let url = client.share_url(&session, playlist.id()).await?;
    session.release().context("Failed to persist the refreshed token")?;

    ctx.say(&m.render(
        MessageKey::PlaylistShared,
        &[("playlist_name", &args.playlist), ("playlist_url", &url)],
    ));
    Ok(())
}
