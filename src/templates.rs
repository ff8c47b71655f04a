use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

const REVIEWER_INVITATION: &str = "\
<div>\
<p>We are inviting you to review a manuscript for the {{ journal_name }} journal.</p>\
{% if abstract is defined %}<p>{{ abstract }}</p>{% endif %}\
<p><a href=\"{{ invite_url }}\">Accept the invitation</a></p>\
</div>";

const HANDOFF_NOTIFICATION: &str =
    "<p>A manuscript was transferred to you for processing as {{ role_name }}.</p>";

/// Email bodies are the only templated output; both templates are compiled
/// once on first use.
pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("reviewer_invitation.html", REVIEWER_INVITATION),
            ("handoff_notification.html", HANDOFF_NOTIFICATION),
        ])
        .expect("Failed to load templates");
        tera
    })
}
