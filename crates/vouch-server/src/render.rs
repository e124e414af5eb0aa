use chrono::{DateTime, Utc};
use discord_client::Embed;
use vouch_core::{Rating, VouchRecord};

pub const VOUCH_TITLE: &str = "New Vouch";

/// Embed body: mention, stars, then the review verbatim in a code block.
pub fn vouch_description(author_id: &str, rating: Rating, review: &str) -> String {
    format!(
        "**Voucher:** <@{author_id}>\n**Rating:** {}\n**Review:**\n```{review}```",
        rating.stars()
    )
}

/// The card shown for a vouch, both on submission and on restore.
///
/// `at` is the embed timestamp: send time for a fresh vouch, the stored
/// creation time when replaying.
pub fn vouch_embed(record: &VouchRecord, at: DateTime<Utc>) -> Embed {
    let embed = Embed::new()
        .title(VOUCH_TITLE)
        .description(vouch_description(
            &record.author_id,
            record.rating,
            &record.review,
        ))
        .thumbnail(record.avatar.clone())
        .timestamp(at);
    match &record.attachment {
        Some(url) => embed.image(url.clone()),
        None => embed,
    }
}
