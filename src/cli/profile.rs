use crate::{info, warning};

use super::{Context, context::fetch};

pub async fn profile(ctx: &Context) {
    let client = ctx.client().await;
    let Some(profile) = fetch("Fetching profile...", client.profile()).await else {
        warning!("Spotify returned no profile.");
        return;
    };

    info!(
        "{} ({})",
        profile.display_name.as_deref().unwrap_or(&profile.id),
        profile.id
    );
    if let Some(email) = &profile.email {
        info!("Email: {}", email);
    }
    if let Some(product) = &profile.product {
        info!("Plan: {}", product);
    }
    if let Some(followers) = &profile.followers {
        info!("Followers: {}", followers.total);
    }
}
