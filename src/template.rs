//! Fixed HTML documents for outbound mail.
//!
//! Both documents are self-contained: inline styles, no external
//! resources. The message fragment is inserted verbatim into the content
//! region, so it may carry its own markup (e.g. a prebuilt list of
//! booking lines); composing fragments and any sanitization are the
//! caller's responsibility.

/// Display name used when the caller has none.
pub const DEFAULT_RECIPIENT_NAME: &str = "User";

/// Render the standard notification document around a message fragment.
pub fn render_notification(fragment: &str, recipient_name: Option<&str>) -> String {
    let name = recipient_name.unwrap_or(DEFAULT_RECIPIENT_NAME);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; }}
        .container {{ max-width: 600px; margin: auto; padding: 20px; }}
        .header {{ background-color: #2563eb; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background-color: #ffffff; }}
        .footer {{ margin-top: 20px; font-size: 0.8em; color: #666; text-align: center; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h2>iReserve System Notification</h2>
        </div>
        <div class="content">
            <p>Dear {name},</p>
            {fragment}
            <p>Best regards,<br>The iReserve Team</p>
        </div>
        <div class="footer">
            <p>&copy; 2025 iReserve Community Sports Facility System</p>
        </div>
    </div>
</body>
</html>
"#
    )
}

/// Render the document used for direct person-to-person messages.
pub fn render_direct_message(fragment: &str) -> String {
    format!(
        r#"<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #2E8B57; color: white; padding: 10px; text-align: center; }}
        .content {{ padding: 20px; }}
        .footer {{ margin-top: 20px; font-size: 0.8em; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h2>Message from iReserve System</h2>
        </div>
        <div class="content">
            <hr>
            {fragment}
        </div>
        <div class="footer">
            <p>This email was sent via the iReserve Community Sports Facility System</p>
        </div>
    </div>
</body>
</html>
"#
    )
}
