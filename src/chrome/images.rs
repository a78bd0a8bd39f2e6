/// Shown for accounts without an avatar.
pub const DEFAULT_ACCOUNT_AVATAR: &str = "https://upload.wikimedia.org/wikipedia/commons/a/ac/Default_pfp.jpg";

/// Shown for a user without an avatar.
pub const DEFAULT_USER_AVATAR: &str = "https://avatar.vercel.sh/leerob";

/// Routes an image through the API's proxy. The source is passed through
/// unmodified.
pub fn proxied_image(api_base_url: &str, src: &str) -> String {
    format!("{}/image?url={}", api_base_url, src)
}

/// Proxied `avatar`, or the proxied `fallback` when it is missing or empty.
pub fn avatar_or(api_base_url: &str, avatar: Option<&str>, fallback: &str) -> String {
    let src = avatar.filter(|a| !a.is_empty()).unwrap_or(fallback);
    proxied_image(api_base_url, src)
}
