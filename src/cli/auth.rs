use std::sync::Arc;

use crate::{error, info, session, spotify, success, warning};

use super::Context;

pub async fn auth(ctx: &Context) {
    info!("Opening Spotify sign-in in your browser...");

    let manager = Arc::clone(&ctx.manager);
    let signed_in = match spotify::auth::sign_in(&ctx.config, manager).await {
        Ok(result) => result,
        Err(e) => error!("Authentication failed. Err: {}", e),
    };

    if let Err(e) = session::save_current(&ctx.data_dir, &signed_in.user).await {
        error!("Failed to save session. Err: {}", e);
    }

    success!("Signed in as {}", signed_in.user.name);
}

pub async fn logout(ctx: &Context) {
    match session::clear_current(&ctx.data_dir).await {
        Ok(true) => success!("Signed out."),
        Ok(false) => warning!("No session to sign out from."),
        Err(e) => error!("Failed to remove session. Err: {}", e),
    }
}
