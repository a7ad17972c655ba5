//! Outgoing mail bodies.

use tenantry_account::User;

use crate::gateway::Contact;

pub(crate) const VERIFICATION_SUBJECT: &str = "email verification";
pub(crate) const PASSWORD_RESET_SUBJECT: &str = "Password reset";

pub(crate) struct Mail {
    pub to: Vec<Contact>,
    pub subject: &'static str,
    pub text: String,
    pub html: String,
}

/// `<domain>/?<key>=<value>`; an empty domain gives a relative link.
fn link(domain: &str, key: &str, value: &str) -> String {
    format!("{}/?{key}={value}", domain.trim_end_matches('/'))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn recipient(user: &User) -> Vec<Contact> {
    vec![Contact {
        email: user.email().to_string(),
        name: user.name().to_string(),
    }]
}

pub(crate) fn verification(domain: &str, user: &User, code: &str) -> Mail {
    let url = link(domain, "user-verification-token", code);
    Mail {
        to: recipient(user),
        subject: VERIFICATION_SUBJECT,
        text: format!(
            "Hi {},\n\nPlease confirm your email address by opening the link below:\n{url}\n",
            user.name()
        ),
        html: format!(
            "<p>Hi {},</p><p>Please confirm your email address:</p><p><a href=\"{url}\">{url}</a></p>",
            escape_html(user.name()),
            url = escape_html(&url)
        ),
    }
}

pub(crate) fn password_reset(domain: &str, user: &User, token: &str) -> Mail {
    let url = link(domain, "pwd-reset-token", token);
    Mail {
        to: recipient(user),
        subject: PASSWORD_RESET_SUBJECT,
        text: format!(
            "Hi {},\n\nTo set a new password, open the link below within 24 hours:\n{url}\n\nIf you did not request this, you can ignore this email.\n",
            user.name()
        ),
        html: format!(
            "<p>Hi {},</p><p>To set a new password, open the link below within 24 hours:</p><p><a href=\"{url}\">{url}</a></p>",
            escape_html(user.name()),
            url = escape_html(&url)
        ),
    }
}
