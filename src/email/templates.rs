/// Build the link mailed to the user. Both query values are percent-encoded.
pub fn reset_link(base_url: &str, token: &str, email: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("token", token)
        .append_pair("email", email)
        .finish();
    format!("{}/reset-password?{query}", base_url.trim_end_matches('/'))
}

pub fn render_password_reset(reset_link: &str) -> String {
    let href = escape_attr(reset_link);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <p>Click the button below to reset your password:</p>
    <p><a href="{href}" style="display: inline-block; padding: 10px 20px; background: #2563eb; color: white; text-decoration: none; border-radius: 5px;">Reset Password</a></p>
    <p style="color: #666; font-size: 14px;">If you didn't request this, you can ignore it.</p>
</body>
</html>"#
    )
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
