//! Server-rendered matching page: the form plus one card per match.

use crate::analyze_request::AnalyzeRequest;
use crate::ui_state::FormState;
use aid_matcher::AidMatch;

const MAP_ZOOM: u8 = 13;

pub struct PageView<'a> {
    pub request: &'a AnalyzeRequest,
    pub state: &'a FormState,
    pub maps_api_key: Option<&'a str>,
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

pub fn navigate_url(lat: f64, lng: f64) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        lat, lng
    )
}

pub fn map_embed_url(api_key: &str, lat: f64, lng: f64) -> String {
    format!(
        "https://www.google.com/maps/embed/v1/place?key={}&q={},{}&zoom={}",
        urlencoding::encode(api_key),
        lat,
        lng,
        MAP_ZOOM
    )
}

/// Only plain web links are rendered as "Apply" targets.
fn application_link(m: &AidMatch) -> Option<&str> {
    m.application_url
        .as_deref()
        .map(str::trim)
        .filter(|url| url.starts_with("https://") || url.starts_with("http://"))
}

pub fn render_card(m: &AidMatch, maps_api_key: Option<&str>) -> String {
    let mut card = String::from("<article class=\"card\">\n<div class=\"card-head\">");
    card.push_str(&format!("<h3>{}</h3>", html_escape(&m.name)));
    if let Some(confidence) = m.confidence {
        card.push_str(&format!(
            "<span class=\"badge\">{}% Match</span>",
            format_number(confidence)
        ));
    }
    card.push_str("</div>\n");
    card.push_str(&format!(
        "<p><span class=\"why\">Why Recommend: </span>{}</p>\n",
        html_escape(&m.reason)
    ));

    if let Some((lat, lng)) = m.coordinates() {
        card.push_str(&format!(
            "<iframe class=\"map\" loading=\"lazy\" referrerpolicy=\"no-referrer-when-downgrade\" src=\"{}\"></iframe>\n",
            html_escape(&map_embed_url(maps_api_key.unwrap_or_default(), lat, lng))
        ));
    }

    card.push_str("<div class=\"actions\">");
    if let Some((lat, lng)) = m.coordinates() {
        card.push_str(&format!(
            "<a class=\"navigate\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">📍 Navigate to Center</a>",
            html_escape(&navigate_url(lat, lng))
        ));
    }
    if let Some(url) = application_link(m) {
        card.push_str(&format!(
            "<a class=\"apply\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Apply Now ➔</a>",
            html_escape(url)
        ));
    }
    card.push_str("</div>\n</article>\n");
    card
}

pub fn render_page(view: &PageView) -> String {
    let has_input = !view.request.is_empty();
    let loading = view.state.is_loading();
    let disabled = if view.state.can_submit(has_input) { "" } else { " disabled" };
    let label = if loading { "🧠 AI is analyzing..." } else { "✨ Match Aid Resources" };
    let image = view.request.image().unwrap_or_default();
    let image_status_hidden = if image.is_empty() { " hidden" } else { "" };

    let alert = match view.state {
        FormState::Error(message) => format!(
            "<div class=\"alert\" role=\"alert\">{}</div>\n",
            html_escape(message)
        ),
        _ => String::new(),
    };

    let results = if matches!(view.state, FormState::Success(_)) {
        let cards: String = view
            .state
            .matches()
            .iter()
            .map(|m| render_card(m, view.maps_api_key))
            .collect();
        format!(
            "<section class=\"results\">\n<h2>🎯 Recommended Solutions:</h2>\n{}</section>\n",
            cards
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>BantuAI</title>
<style>
body {{ font-family: sans-serif; background: #eef2ff; margin: 0; padding: 2rem; }}
main {{ max-width: 48rem; margin: 0 auto; }}
h1 {{ text-align: center; color: #312e81; }}
.panel, .card {{ background: #fff; border-radius: 1.5rem; padding: 1.5rem; margin-bottom: 1.5rem; box-shadow: 0 10px 25px rgba(0,0,0,.08); }}
.card {{ border-left: 8px solid #6366f1; }}
.card-head {{ display: flex; justify-content: space-between; align-items: start; }}
.badge {{ background: #dcfce7; color: #166534; border-radius: 999px; padding: .25rem .75rem; font-weight: bold; white-space: nowrap; }}
.why {{ color: #4f46e5; font-weight: 600; }}
.map {{ width: 100%; height: 12rem; border: 0; border-radius: 1rem; }}
.actions {{ display: flex; justify-content: flex-end; gap: .75rem; margin-top: .5rem; }}
.apply {{ background: #4f46e5; color: #fff; padding: .5rem 1.5rem; border-radius: .75rem; text-decoration: none; font-weight: bold; }}
.alert {{ background: #fee2e2; color: #991b1b; border-radius: 1rem; padding: 1rem; margin-bottom: 1rem; }}
textarea {{ width: 100%; height: 6rem; box-sizing: border-box; border-radius: 1rem; padding: 1rem; font-size: 1rem; }}
button[type=submit] {{ width: 100%; padding: 1rem; margin-top: 1rem; border: 0; border-radius: 1rem; background: #4f46e5; color: #fff; font-size: 1.1rem; font-weight: bold; }}
button[disabled] {{ background: #a5b4fc; cursor: not-allowed; }}
</style>
</head>
<body>
<main>
<h1>Bantu<span style="color:#2563eb">AI</span> 🤝</h1>
<p style="text-align:center">Scan Bills · Intelligent Aid Matching</p>
{alert}<form class="panel" id="analyze-form" method="post" action="/">
<label for="userInput"><strong>Describe your situation or upload a bill/notice 📸:</strong></label>
<textarea id="userInput" name="userInput" placeholder="E.g., I lost my job and have two children...">{user_input}</textarea>
<label>📷 Take Photo / Upload <input type="file" id="photo" accept="image/*"></label>
<input type="hidden" id="imageBase64" name="imageBase64" value="{image}">
<span id="image-status"{image_status_hidden}>✅ Image Uploaded <button type="button" id="remove-image">Delete</button></span>
<button type="submit" id="submit"{disabled}>{label}</button>
</form>
{results}</main>
<script>
(function () {{
  var form = document.getElementById('analyze-form');
  var text = document.getElementById('userInput');
  var image = document.getElementById('imageBase64');
  var photo = document.getElementById('photo');
  var status = document.getElementById('image-status');
  var submit = document.getElementById('submit');
  function refresh() {{
    status.hidden = !image.value;
    submit.disabled = !text.value.trim() && !image.value;
  }}
  photo.addEventListener('change', function () {{
    var file = photo.files && photo.files[0];
    if (!file) return;
    var reader = new FileReader();
    reader.onload = function () {{ image.value = reader.result; refresh(); }};
    reader.readAsDataURL(file);
  }});
  document.getElementById('remove-image').addEventListener('click', function () {{
    image.value = ''; photo.value = ''; refresh();
  }});
  text.addEventListener('input', refresh);
  form.addEventListener('submit', function (e) {{
    if (submit.disabled) {{ e.preventDefault(); return; }}
    submit.disabled = true;
    submit.textContent = '🧠 AI is analyzing...';
  }});
}})();
</script>
</body>
</html>
"#,
        alert = alert,
        user_input = html_escape(view.request.user_input.as_deref().unwrap_or_default()),
        image = html_escape(image),
        image_status_hidden = image_status_hidden,
        disabled = disabled,
        label = label,
        results = results,
    )
}
