//! Utility-class to inline CSS translation.

use tracing::trace;

use crate::palette::{looks_like_color, resolve_color};

const SANS_STACK: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif";
const SERIF_STACK: &str = "Georgia, Cambria, 'Times New Roman', Times, serif";
const MONO_STACK: &str =
    "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace";

/// Ordered declaration list; re-setting a property replaces it in place.
#[derive(Debug, Default)]
struct Declarations(Vec<(String, String)>);

impl Declarations {
    fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => slot.1 = value,
            None => self.0.push((property.to_string(), value)),
        }
    }

    fn set_all(&mut self, properties: &[&str], value: &str) {
        for property in properties {
            self.set(property, value);
        }
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Default)]
struct Gradient {
    direction: Option<&'static str>,
    from: Option<String>,
    via: Option<String>,
    to: Option<String>,
}

impl Gradient {
    fn render(&self) -> Option<String> {
        let direction = self.direction?;
        if self.from.is_none() && self.to.is_none() {
            return None;
        }
        let mut stops = vec![self.from.clone().unwrap_or_else(|| "transparent".into())];
        stops.extend(self.via.clone());
        stops.push(self.to.clone().unwrap_or_else(|| "transparent".into()));
        Some(format!("linear-gradient({direction}, {})", stops.join(", ")))
    }
}

/// Translate a whitespace-separated utility class list into inline CSS.
///
/// Unknown and variant-prefixed (`md:`, `hover:`, `dark:`) tokens are dropped.
/// Never fails; an empty or fully unrecognized input yields an empty string.
pub fn to_inline_style(classes: &str) -> String {
    let mut decls = Declarations::default();
    let mut gradient = Gradient::default();

    for raw in classes.split_whitespace() {
        if has_variant(raw) {
            trace!(token = raw, "dropping variant utility");
            continue;
        }
        let token = raw.strip_prefix('!').unwrap_or(raw);
        if !apply_token(token, &mut decls, &mut gradient) {
            trace!(token, "dropping unknown utility");
        }
    }

    if let Some(image) = gradient.render() {
        decls.set("background-image", image);
    }
    decls.render()
}

fn has_variant(token: &str) -> bool {
    match (token.find(':'), token.find('[')) {
        (Some(colon), Some(bracket)) => colon < bracket,
        (Some(_), None) => true,
        _ => false,
    }
}

fn apply_token(token: &str, d: &mut Declarations, g: &mut Gradient) -> bool {
    if let Some(pairs) = fixed_utility(token) {
        for (property, value) in pairs {
            d.set(property, *value);
        }
        return true;
    }

    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if let Some(applied) = apply_spacing(body, negative, d) {
        return applied;
    }
    if negative {
        return false;
    }

    if let Some(v) = body.strip_prefix("max-w-") {
        return set_opt(d, "max-width", max_width(v));
    }
    if let Some(v) = body.strip_prefix("max-h-") {
        return set_opt(d, "max-height", size(v, "100vh"));
    }
    if let Some(v) = body.strip_prefix("min-w-") {
        return set_opt(d, "min-width", size(v, "100vw"));
    }
    if let Some(v) = body.strip_prefix("min-h-") {
        return set_opt(d, "min-height", size(v, "100vh"));
    }
    if let Some(v) = body.strip_prefix("w-") {
        return set_opt(d, "width", size(v, "100vw"));
    }
    if let Some(v) = body.strip_prefix("h-") {
        return set_opt(d, "height", size(v, "100vh"));
    }
    if let Some(v) = body.strip_prefix("text-") {
        return apply_text(v, d);
    }
    if let Some(v) = body.strip_prefix("font-") {
        return apply_font(v, d);
    }
    if let Some(v) = body.strip_prefix("leading-") {
        return set_opt(d, "line-height", leading(v));
    }
    if let Some(v) = body.strip_prefix("tracking-") {
        return set_opt(d, "letter-spacing", tracking(v));
    }
    if let Some(v) = body.strip_prefix("rounded") {
        return apply_rounded(v, d);
    }
    if let Some(v) = body.strip_prefix("shadow") {
        return set_opt(d, "box-shadow", shadow(v));
    }
    if let Some(v) = body.strip_prefix("opacity-") {
        return set_opt(d, "opacity", percent_fraction(v));
    }
    if let Some(v) = body.strip_prefix("border") {
        return apply_border(v, d);
    }
    if let Some(v) = body.strip_prefix("bg-") {
        return apply_background(v, d, g);
    }
    if let Some(v) = body.strip_prefix("from-") {
        g.from = resolve_color(v);
        return g.from.is_some();
    }
    if let Some(v) = body.strip_prefix("via-") {
        g.via = resolve_color(v);
        return g.via.is_some();
    }
    if let Some(v) = body.strip_prefix("to-") {
        g.to = resolve_color(v);
        return g.to.is_some();
    }
    if let Some(v) = body.strip_prefix("indent-") {
        return set_opt(d, "text-indent", spacing(v));
    }
    false
}

fn set_opt(d: &mut Declarations, property: &str, value: Option<String>) -> bool {
    match value {
        Some(value) => {
            d.set(property, value);
            true
        }
        None => false,
    }
}

type Pairs = &'static [(&'static str, &'static str)];

fn fixed_utility(token: &str) -> Option<Pairs> {
    let pairs: Pairs = match token {
        "block" => &[("display", "block")],
        "inline-block" => &[("display", "inline-block")],
        "inline" => &[("display", "inline")],
        "flex" => &[("display", "flex")],
        "inline-flex" => &[("display", "inline-flex")],
        "grid" => &[("display", "grid")],
        "table" => &[("display", "table")],
        "hidden" => &[("display", "none")],
        "flex-row" => &[("flex-direction", "row")],
        "flex-col" => &[("flex-direction", "column")],
        "flex-wrap" => &[("flex-wrap", "wrap")],
        "flex-nowrap" => &[("flex-wrap", "nowrap")],
        "flex-1" => &[("flex", "1 1 0%")],
        "flex-auto" => &[("flex", "1 1 auto")],
        "flex-none" => &[("flex", "none")],
        "grow" => &[("flex-grow", "1")],
        "shrink-0" => &[("flex-shrink", "0")],
        "items-start" => &[("align-items", "flex-start")],
        "items-center" => &[("align-items", "center")],
        "items-end" => &[("align-items", "flex-end")],
        "items-baseline" => &[("align-items", "baseline")],
        "items-stretch" => &[("align-items", "stretch")],
        "justify-start" => &[("justify-content", "flex-start")],
        "justify-center" => &[("justify-content", "center")],
        "justify-end" => &[("justify-content", "flex-end")],
        "justify-between" => &[("justify-content", "space-between")],
        "justify-around" => &[("justify-content", "space-around")],
        "justify-evenly" => &[("justify-content", "space-evenly")],
        "self-center" => &[("align-self", "center")],
        "text-left" => &[("text-align", "left")],
        "text-center" => &[("text-align", "center")],
        "text-right" => &[("text-align", "right")],
        "text-justify" => &[("text-align", "justify")],
        "italic" => &[("font-style", "italic")],
        "not-italic" => &[("font-style", "normal")],
        "underline" => &[("text-decoration-line", "underline")],
        "line-through" => &[("text-decoration-line", "line-through")],
        "no-underline" => &[("text-decoration-line", "none")],
        "uppercase" => &[("text-transform", "uppercase")],
        "lowercase" => &[("text-transform", "lowercase")],
        "capitalize" => &[("text-transform", "capitalize")],
        "normal-case" => &[("text-transform", "none")],
        "truncate" => &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
        "whitespace-normal" => &[("white-space", "normal")],
        "whitespace-nowrap" => &[("white-space", "nowrap")],
        "whitespace-pre" => &[("white-space", "pre")],
        "whitespace-pre-wrap" => &[("white-space", "pre-wrap")],
        "whitespace-pre-line" => &[("white-space", "pre-line")],
        "break-words" => &[("overflow-wrap", "break-word")],
        "break-all" => &[("word-break", "break-all")],
        "overflow-hidden" => &[("overflow", "hidden")],
        "overflow-auto" => &[("overflow", "auto")],
        "overflow-visible" => &[("overflow", "visible")],
        "overflow-x-auto" => &[("overflow-x", "auto")],
        "relative" => &[("position", "relative")],
        "absolute" => &[("position", "absolute")],
        "static" => &[("position", "static")],
        "list-disc" => &[("list-style-type", "disc")],
        "list-decimal" => &[("list-style-type", "decimal")],
        "list-none" => &[("list-style-type", "none")],
        "list-inside" => &[("list-style-position", "inside")],
        "list-outside" => &[("list-style-position", "outside")],
        "border-solid" => &[("border-style", "solid")],
        "border-dashed" => &[("border-style", "dashed")],
        "border-dotted" => &[("border-style", "dotted")],
        "border-double" => &[("border-style", "double")],
        "border-none" => &[("border-style", "none")],
        "bg-cover" => &[("background-size", "cover")],
        "bg-contain" => &[("background-size", "contain")],
        "bg-center" => &[("background-position", "center")],
        "bg-no-repeat" => &[("background-repeat", "no-repeat")],
        "object-cover" => &[("object-fit", "cover")],
        "object-contain" => &[("object-fit", "contain")],
        "align-top" => &[("vertical-align", "top")],
        "align-middle" => &[("vertical-align", "middle")],
        "align-bottom" => &[("vertical-align", "bottom")],
        "box-border" => &[("box-sizing", "border-box")],
        "box-content" => &[("box-sizing", "content-box")],
        "antialiased" => &[("-webkit-font-smoothing", "antialiased")],
        _ => return None,
    };
    Some(pairs)
}

const SPACING_PREFIXES: &[(&str, &[&str])] = &[
    ("p-", &["padding"]),
    ("px-", &["padding-left", "padding-right"]),
    ("py-", &["padding-top", "padding-bottom"]),
    ("pt-", &["padding-top"]),
    ("pr-", &["padding-right"]),
    ("pb-", &["padding-bottom"]),
    ("pl-", &["padding-left"]),
    ("m-", &["margin"]),
    ("mx-", &["margin-left", "margin-right"]),
    ("my-", &["margin-top", "margin-bottom"]),
    ("mt-", &["margin-top"]),
    ("mr-", &["margin-right"]),
    ("mb-", &["margin-bottom"]),
    ("ml-", &["margin-left"]),
    ("gap-x-", &["column-gap"]),
    ("gap-y-", &["row-gap"]),
    ("gap-", &["gap"]),
];

/// `Some(applied)` when the token is a spacing utility, `None` otherwise.
fn apply_spacing(body: &str, negative: bool, d: &mut Declarations) -> Option<bool> {
    let (prefix, properties) = SPACING_PREFIXES
        .iter()
        .find(|(prefix, _)| body.starts_with(prefix))?;
    let value = &body[prefix.len()..];
    let is_margin = prefix.starts_with('m');

    if negative && !is_margin {
        return Some(false);
    }
    let resolved = if value == "auto" && is_margin {
        Some("auto".to_string())
    } else {
        spacing(value)
    };
    let Some(resolved) = resolved else {
        return Some(false);
    };
    let resolved = if negative && resolved != "0px" && resolved != "auto" {
        format!("-{resolved}")
    } else if negative && resolved == "auto" {
        return Some(false);
    } else {
        resolved
    };
    d.set_all(properties, &resolved);
    Some(true)
}

/// Spacing scale: one step is 4px.
fn spacing(value: &str) -> Option<String> {
    if let Some(arbitrary) = arbitrary(value) {
        return Some(arbitrary);
    }
    match value {
        "0" => Some("0px".into()),
        "px" => Some("1px".into()),
        _ => {
            let steps: f64 = value.parse().ok()?;
            let px = steps * 4.0;
            if !px.is_finite() || steps < 0.0 {
                return None;
            }
            Some(format!("{}px", format_number(px)))
        }
    }
}

fn size(value: &str, screen: &str) -> Option<String> {
    match value {
        "full" => Some("100%".into()),
        "screen" => Some(screen.into()),
        "auto" => Some("auto".into()),
        "fit" => Some("fit-content".into()),
        "min" => Some("min-content".into()),
        "max" => Some("max-content".into()),
        _ => {
            if let Some((num, den)) = value.split_once('/') {
                let num: f64 = num.parse().ok()?;
                let den: f64 = den.parse().ok()?;
                let pct = num / den * 100.0;
                if den == 0.0 || !pct.is_finite() {
                    return None;
                }
                return Some(format!("{}%", format_number(pct)));
            }
            spacing(value)
        }
    }
}

fn max_width(value: &str) -> Option<String> {
    let px = match value {
        "none" => return Some("none".into()),
        "full" => return Some("100%".into()),
        "prose" => return Some("65ch".into()),
        "xs" => 320,
        "sm" => 384,
        "md" => 448,
        "lg" => 512,
        "xl" => 576,
        "2xl" => 672,
        "3xl" => 768,
        "4xl" => 896,
        "5xl" => 1024,
        "6xl" => 1152,
        "7xl" => 1280,
        _ => return arbitrary(value),
    };
    Some(format!("{px}px"))
}

fn apply_text(value: &str, d: &mut Declarations) -> bool {
    if let Some((size, line_height)) = text_size(value) {
        d.set("font-size", size);
        d.set("line-height", line_height);
        return true;
    }
    if let Some(inner) = arbitrary(value) {
        if looks_like_color(&inner) {
            d.set("color", inner.trim_start_matches("color:").to_string());
        } else {
            d.set("font-size", inner);
        }
        return true;
    }
    set_opt(d, "color", resolve_color(value))
}

fn text_size(value: &str) -> Option<(&'static str, &'static str)> {
    Some(match value {
        "xs" => ("12px", "16px"),
        "sm" => ("14px", "20px"),
        "base" => ("16px", "24px"),
        "lg" => ("18px", "28px"),
        "xl" => ("20px", "28px"),
        "2xl" => ("24px", "32px"),
        "3xl" => ("30px", "36px"),
        "4xl" => ("36px", "40px"),
        "5xl" => ("48px", "1"),
        "6xl" => ("60px", "1"),
        "7xl" => ("72px", "1"),
        "8xl" => ("96px", "1"),
        "9xl" => ("128px", "1"),
        _ => return None,
    })
}

fn apply_font(value: &str, d: &mut Declarations) -> bool {
    let weight = match value {
        "thin" => "100",
        "extralight" => "200",
        "light" => "300",
        "normal" => "400",
        "medium" => "500",
        "semibold" => "600",
        "bold" => "700",
        "extrabold" => "800",
        "black" => "900",
        "sans" => {
            d.set("font-family", SANS_STACK);
            return true;
        }
        "serif" => {
            d.set("font-family", SERIF_STACK);
            return true;
        }
        "mono" => {
            d.set("font-family", MONO_STACK);
            return true;
        }
        _ => {
            let Some(inner) = arbitrary(value) else {
                return false;
            };
            if inner.bytes().all(|b| b.is_ascii_digit()) {
                d.set("font-weight", inner);
            } else {
                d.set("font-family", inner);
            }
            return true;
        }
    };
    d.set("font-weight", weight);
    true
}

fn leading(value: &str) -> Option<String> {
    let fixed = match value {
        "none" => "1",
        "tight" => "1.25",
        "snug" => "1.375",
        "normal" => "1.5",
        "relaxed" => "1.625",
        "loose" => "2",
        _ => {
            if let Some(inner) = arbitrary(value) {
                return Some(inner);
            }
            let steps: u32 = value.parse().ok()?;
            if !(3..=10).contains(&steps) {
                return None;
            }
            return Some(format!("{}px", steps * 4));
        }
    };
    Some(fixed.to_string())
}

fn tracking(value: &str) -> Option<String> {
    let fixed = match value {
        "tighter" => "-0.05em",
        "tight" => "-0.025em",
        "normal" => "0em",
        "wide" => "0.025em",
        "wider" => "0.05em",
        "widest" => "0.1em",
        _ => return arbitrary(value),
    };
    Some(fixed.to_string())
}

fn radius(value: &str) -> Option<String> {
    let fixed = match value {
        "" => "4px",
        "none" => "0px",
        "sm" => "2px",
        "md" => "6px",
        "lg" => "8px",
        "xl" => "12px",
        "2xl" => "16px",
        "3xl" => "24px",
        "full" => "9999px",
        _ => return arbitrary(value),
    };
    Some(fixed.to_string())
}

fn radius_corners(side: &str) -> Option<&'static [&'static str]> {
    let corners: &'static [&'static str] = match side {
        "t" => &["border-top-left-radius", "border-top-right-radius"],
        "r" => &["border-top-right-radius", "border-bottom-right-radius"],
        "b" => &["border-bottom-right-radius", "border-bottom-left-radius"],
        "l" => &["border-top-left-radius", "border-bottom-left-radius"],
        "tl" => &["border-top-left-radius"],
        "tr" => &["border-top-right-radius"],
        "br" => &["border-bottom-right-radius"],
        "bl" => &["border-bottom-left-radius"],
        _ => return None,
    };
    Some(corners)
}

/// `rest` is what follows `rounded`: empty, `-lg`, `-t`, `-tl-xl`, ...
fn apply_rounded(rest: &str, d: &mut Declarations) -> bool {
    if rest.is_empty() {
        d.set("border-radius", "4px");
        return true;
    }
    let Some(rest) = rest.strip_prefix('-') else {
        return false;
    };
    if let Some(value) = radius(rest) {
        d.set("border-radius", value);
        return true;
    }
    let (side, size) = rest.split_once('-').unwrap_or((rest, ""));
    match (radius_corners(side), radius(size)) {
        (Some(corners), Some(value)) => {
            d.set_all(corners, &value);
            true
        }
        _ => false,
    }
}

fn shadow(rest: &str) -> Option<String> {
    let fixed = match rest {
        "" => "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px -1px rgba(0, 0, 0, 0.1)",
        "-sm" => "0 1px 2px 0 rgba(0, 0, 0, 0.05)",
        "-md" => "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)",
        "-lg" => "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -4px rgba(0, 0, 0, 0.1)",
        "-xl" => "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 8px 10px -6px rgba(0, 0, 0, 0.1)",
        "-2xl" => "0 25px 50px -12px rgba(0, 0, 0, 0.25)",
        "-inner" => "inset 0 2px 4px 0 rgba(0, 0, 0, 0.05)",
        "-none" => "none",
        _ => return rest.strip_prefix('-').and_then(arbitrary),
    };
    Some(fixed.to_string())
}

fn border_sides(side: &str) -> Option<&'static [&'static str]> {
    let sides: &'static [&'static str] = match side {
        "t" => &["top"],
        "r" => &["right"],
        "b" => &["bottom"],
        "l" => &["left"],
        "x" => &["left", "right"],
        "y" => &["top", "bottom"],
        _ => return None,
    };
    Some(sides)
}

fn border_width(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("1px".into());
    }
    if let Some(inner) = arbitrary(value) {
        return (!looks_like_color(&inner)).then_some(inner);
    }
    let px: u32 = value.parse().ok()?;
    Some(format!("{px}px"))
}

/// `rest` is what follows `border`: empty, `-2`, `-l-4`, `-slate-200`, ...
fn apply_border(rest: &str, d: &mut Declarations) -> bool {
    let set_width = |d: &mut Declarations, prefix: &str, width: String| {
        let solid = width != "0px";
        d.set(&format!("{prefix}-width"), width);
        if solid {
            d.set(&format!("{prefix}-style"), "solid");
        }
    };

    if rest.is_empty() {
        set_width(d, "border", "1px".into());
        return true;
    }
    let Some(rest) = rest.strip_prefix('-') else {
        return false;
    };

    let (head, tail) = match rest.split_once('-') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };
    if let Some(sides) = border_sides(head) {
        let tail = tail.unwrap_or("");
        if let Some(width) = border_width(tail) {
            for side in sides {
                set_width(d, &format!("border-{side}"), width.clone());
            }
            return true;
        }
        if let Some(color) = resolve_color(tail) {
            for side in sides {
                d.set(&format!("border-{side}-color"), color.clone());
            }
            return true;
        }
        return false;
    }

    if let Some(width) = border_width(rest) {
        set_width(d, "border", width);
        return true;
    }
    set_opt(d, "border-color", resolve_color(rest))
}

fn apply_background(value: &str, d: &mut Declarations, g: &mut Gradient) -> bool {
    if let Some(direction) = value.strip_prefix("gradient-to-") {
        g.direction = Some(match direction {
            "t" => "to top",
            "tr" => "to top right",
            "r" => "to right",
            "br" => "to bottom right",
            "b" => "to bottom",
            "bl" => "to bottom left",
            "l" => "to left",
            "tl" => "to top left",
            _ => return false,
        });
        return true;
    }
    if let Some(color) = resolve_color(value) {
        d.set("background-color", color);
        return true;
    }
    set_opt(d, "background", arbitrary(value))
}

fn percent_fraction(value: &str) -> Option<String> {
    let pct: u32 = value.parse().ok()?;
    if pct > 100 {
        return None;
    }
    Some(format_number(f64::from(pct) / 100.0))
}

/// Contents of a `[...]` arbitrary value, with `_` read as a space.
fn arbitrary(value: &str) -> Option<String> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains([';', '<', '>', '{', '}']) {
        return None;
    }
    Some(inner.replace('_', " ").replace('"', "'"))
}

fn format_number(n: f64) -> String {
    let text = format!("{n:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_common_utilities() {
        assert_eq!(
            to_inline_style("p-4 text-lg font-bold"),
            "padding: 16px; font-size: 18px; line-height: 28px; font-weight: 700;"
        );
        assert_eq!(
            to_inline_style("mx-auto max-w-2xl"),
            "margin-left: auto; margin-right: auto; max-width: 672px;"
        );
        assert_eq!(to_inline_style("-mt-2 py-0.5"), "margin-top: -8px; padding-top: 2px; padding-bottom: 2px;");
    }

    #[test]
    fn later_duplicates_override_in_place() {
        assert_eq!(to_inline_style("p-4 p-2"), "padding: 8px;");
        assert_eq!(
            to_inline_style("px-4 pl-2 text-center"),
            "padding-left: 8px; padding-right: 16px; text-align: center;"
        );
    }

    #[test]
    fn rejects_spacing_that_overflows() {
        assert_eq!(to_inline_style("p-1e308"), "");
        assert_eq!(to_inline_style("p-1e308 m-2"), "margin: 8px;");
        assert_eq!(to_inline_style("w-1e308/1e-10 h-1/2"), "height: 50%;");
    }

    #[test]
    fn drops_variants_and_unknown_tokens() {
        assert_eq!(
            to_inline_style("md:p-8 hover:bg-red-500 dark:text-white text-center"),
            "text-align: center;"
        );
        assert_eq!(to_inline_style("prose foo-bar"), "");
        assert_eq!(to_inline_style(""), "");
        assert_eq!(to_inline_style("   "), "");
    }

    #[test]
    fn resolves_colors_and_arbitrary_values() {
        assert_eq!(
            to_inline_style("text-slate-500/80"),
            "color: rgba(100, 116, 139, 0.8);"
        );
        assert_eq!(
            to_inline_style("bg-[#fafafa] text-[15px] font-['Noto_Serif_SC']"),
            "background-color: #fafafa; font-size: 15px; font-family: 'Noto Serif SC';"
        );
    }

    #[test]
    fn builds_borders_with_explicit_style() {
        assert_eq!(
            to_inline_style("border border-slate-200"),
            "border-width: 1px; border-style: solid; border-color: #e2e8f0;"
        );
        assert_eq!(
            to_inline_style("border-l-4 border-amber-500"),
            "border-left-width: 4px; border-left-style: solid; border-color: #f59e0b;"
        );
        assert_eq!(to_inline_style("border-b-blue-500"), "border-bottom-color: #3b82f6;");
        assert_eq!(to_inline_style("border-transparent"), "border-color: transparent;");
    }

    #[test]
    fn builds_radii_and_shadows() {
        assert_eq!(to_inline_style("rounded-xl"), "border-radius: 12px;");
        assert_eq!(
            to_inline_style("rounded-t-lg"),
            "border-top-left-radius: 8px; border-top-right-radius: 8px;"
        );
        assert_eq!(
            to_inline_style("shadow-sm"),
            "box-shadow: 0 1px 2px 0 rgba(0, 0, 0, 0.05);"
        );
    }

    #[test]
    fn builds_gradients() {
        assert_eq!(
            to_inline_style("bg-gradient-to-r from-indigo-500 to-pink-500"),
            "background-image: linear-gradient(to right, #6366f1, #ec4899);"
        );
        assert_eq!(
            to_inline_style("from-white via-slate-100 bg-gradient-to-b"),
            "background-image: linear-gradient(to bottom, #ffffff, #f1f5f9, transparent);"
        );
    }

    #[test]
    fn sizes_and_fractions() {
        assert_eq!(to_inline_style("w-1/2 h-full"), "width: 50%; height: 100%;");
        assert_eq!(to_inline_style("w-1/3"), "width: 33.3333%;");
        assert_eq!(to_inline_style("opacity-75 leading-relaxed"), "opacity: 0.75; line-height: 1.625;");
    }

    #[test]
    fn never_panics_on_malformed_tokens() {
        for token in [
            "[", "-", "--", "text-[", "p-[;]", "w-1/0", "bg-/", "/", "rounded--", "border-",
            "border-l-", "-p-4", "-mx-auto", "shadow-", "text-[]", "from-", "bg-gradient-to-",
            "font-[", "opacity-999", "leading-99", "w-1/", "::", "p-NaN", "p-inf", "排版",
        ] {
            let _ = to_inline_style(token);
        }
        assert_eq!(to_inline_style("p-NaN p-inf -p-4"), "");
    }
}
