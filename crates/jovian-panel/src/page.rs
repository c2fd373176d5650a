//! Control listing and the HTML slider page.

use std::fmt::Write;

use jovian_shading::{COLOR_SCHEME_LABEL, CONTROLS, ColorScheme, ControlDescriptor};
use jovian_shading::params::COLOR_SCHEME_KEY;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeOption {
    pub label: &'static str,
    pub value: i32,
}

/// One entry of `GET /controls`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlInfo {
    Slider {
        param: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        step: f32,
        /// `None` when the control is left alone by randomize.
        randomize: Option<[f32; 2]>,
    },
    Dropdown {
        param: &'static str,
        label: &'static str,
        options: Vec<SchemeOption>,
    },
}

impl From<&ControlDescriptor> for ControlInfo {
    fn from(control: &ControlDescriptor) -> Self {
        ControlInfo::Slider {
            param: control.param.key(),
            label: control.label,
            min: control.min,
            max: control.max,
            step: control.step,
            randomize: control.randomize_bounds().map(|(lo, hi)| [lo, hi]),
        }
    }
}

/// Every slider in panel order, then the color scheme dropdown.
pub fn control_list() -> Vec<ControlInfo> {
    CONTROLS
        .iter()
        .map(ControlInfo::from)
        .chain(std::iter::once(ControlInfo::Dropdown {
            param: COLOR_SCHEME_KEY,
            label: COLOR_SCHEME_LABEL,
            options: ColorScheme::ALL
                .iter()
                .map(|scheme| SchemeOption {
                    label: scheme.label(),
                    value: scheme.value(),
                })
                .collect(),
        }))
        .collect()
}

const STYLE: &str = "body{font-family:monospace;background:#111;color:#ddd;max-width:32em;margin:2em auto}\
label{display:block;margin-top:.8em}input[type=range]{width:100%}\
button,select{margin-top:1em;background:#222;color:#ddd;border:1px solid #555;padding:.3em .8em}\
#stats{margin-top:1.5em;color:#888}";

const SCRIPT: &str = r#"
async function post(path, body) {
  await fetch(path, {method: 'POST', headers: {'Content-Type': 'application/json'}, body: JSON.stringify(body || {})});
  setTimeout(refresh, 50);
}
function setParam(param, value) { post('/params', {param: param, value: parseFloat(value)}); }
function setScheme(scheme) { post('/scheme', {scheme: scheme}); }
function randomize() { post('/randomize'); }
async function refresh() {
  const snap = await (await fetch('/params')).json();
  for (const [key, value] of Object.entries(snap.params)) {
    const input = document.getElementById(key);
    if (input && document.activeElement !== input) input.value = value;
    const out = document.getElementById(key + '-value');
    if (out) out.textContent = value.toFixed(2);
  }
  document.getElementById('colorScheme').value = snap.color_scheme;
  document.getElementById('stats').textContent =
    snap.fps.toFixed(1) + ' fps, ' + snap.frame_time_ms.toFixed(2) + ' ms';
}
refresh();
setInterval(refresh, 1000);
"#;

/// The page served on `GET /`.
pub fn render_page() -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Jovian</title>");
    let _ = write!(html, "<style>{STYLE}</style></head><body><h1>Jovian</h1>");

    for control in &CONTROLS {
        let key = control.param.key();
        let _ = write!(
            html,
            "<label>{label} <span id=\"{key}-value\"></span>\
             <input type=\"range\" id=\"{key}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" \
             oninput=\"setParam('{key}', this.value)\"></label>",
            label = control.label,
            min = control.min,
            max = control.max,
            step = control.step,
        );
    }

    let _ = write!(
        html,
        "<label>{COLOR_SCHEME_LABEL}<select id=\"{COLOR_SCHEME_KEY}\" onchange=\"setScheme(this.value)\">"
    );
    for scheme in ColorScheme::ALL {
        let _ = write!(html, "<option value=\"{0}\">{0}</option>", scheme.label());
    }
    html.push_str("</select></label>");
    html.push_str("<button onclick=\"randomize()\">Randomize</button><div id=\"stats\"></div>");
    let _ = write!(html, "<script>{SCRIPT}</script></body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_list_covers_every_control_and_scheme() {
        let list = control_list();
        assert_eq!(list.len(), CONTROLS.len() + 1);
        match list.last() {
            Some(ControlInfo::Dropdown { param, options, .. }) => {
                assert_eq!(*param, "colorScheme");
                let values: Vec<_> = options.iter().map(|o| o.value).collect();
                assert_eq!(values, vec![1, 2, 3, 4]);
            }
            other => panic!("expected dropdown, got {other:?}"),
        }
    }

    #[test]
    fn test_time_speed_has_no_randomize_range() {
        let json = serde_json::to_value(control_list()).unwrap();
        let time_speed = json
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["param"] == "timeSpeed")
            .unwrap();
        assert_eq!(time_speed["kind"], "slider");
        assert!(time_speed["randomize"].is_null());
    }

    #[test]
    fn test_page_has_slider_per_control() {
        let page = render_page();
        for control in &CONTROLS {
            assert!(page.contains(&format!("id=\"{}\"", control.param.key())));
            assert!(page.contains(control.label));
        }
        assert!(page.contains("reverse ana."));
        assert!(page.contains("Randomize"));
    }
}
