//! Scripts evaluated in page context.

/// Describes every text-bearing candidate in document order.
///
/// Returns `[{index, text, width, height, display, visibility, opacity}]`;
/// `index` addresses the same element for [`CLICK_CANDIDATE_JS`].
pub const TEXT_CANDIDATES_JS: &str = r#"
const selector = arguments[0];
const nodes = Array.from(document.querySelectorAll(selector));
const out = [];
nodes.forEach((el, index) => {
  const text = (el.innerText || el.textContent || '').trim();
  if (!text) return;
  const rect = el.getBoundingClientRect();
  const style = window.getComputedStyle(el);
  out.push({
    index: index,
    text: text,
    width: rect.width,
    height: rect.height,
    display: style.display,
    visibility: style.visibility,
    opacity: style.opacity
  });
});
return out;
"#;

/// Scrolls candidate `arguments[1]` of selector `arguments[0]` into view and
/// clicks it, provided its trimmed text still equals `arguments[2]`.
pub const CLICK_CANDIDATE_JS: &str = r#"
const nodes = document.querySelectorAll(arguments[0]);
const el = nodes[arguments[1]];
if (!el) return false;
const text = (el.innerText || el.textContent || '').trim();
if (text !== arguments[2]) return false;
try {
  el.scrollIntoView({behavior: 'instant', block: 'center', inline: 'center'});
  el.click();
  return true;
} catch (e) {
  return false;
}
"#;

/// Forces a (possibly hidden or disabled) file input into an interactable state.
pub const REVEAL_FILE_INPUT_JS: &str = r#"
const el = arguments[0];
el.style.display = 'block';
el.style.visibility = 'visible';
el.removeAttribute('disabled');
el.removeAttribute('readonly');
el.style.opacity = '1';
el.style.position = 'fixed';
el.style.zIndex = '99999';
return true;
"#;

pub const SCROLL_INTO_VIEW_JS: &str =
    "arguments[0].scrollIntoView({behavior: 'instant', block: 'center', inline: 'center'}); return true;";

pub const SCRIPT_CLICK_JS: &str = "arguments[0].click(); return true;";

/// Scrolls the document and every horizontally overflowing container fully right.
pub const SCROLL_HORIZONTAL_JS: &str = r#"
try {
  const root = document.scrollingElement || document.documentElement || document.body;
  if (root && root.scrollWidth - root.clientWidth > 5) {
    root.scrollLeft = root.scrollWidth;
  }
  for (const el of Array.from(document.querySelectorAll('*'))) {
    const sw = el.scrollWidth || 0;
    const cw = el.clientWidth || 0;
    if (sw - cw > 5) {
      el.scrollLeft = sw;
    }
  }
} catch (e) {}
return true;
"#;
