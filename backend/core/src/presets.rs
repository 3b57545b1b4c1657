//! Built-in designs and style prompts.

use crate::design::{DesignDescriptor, LayoutType};

/// A named style prompt offered as a quick start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        name: "wechat",
        prompt: "WeChat Official Account style. Flat layout, max-w-xl. Headings (H2) should be very \
                 decorative: use colored pills (rounded-full bg-blue-50), left borders, or bottom \
                 borders. Font size slightly larger (text-[17px]) for good readability. \
                 Comfortable line height. Auto-extract key points into headers.",
    },
    StylePreset {
        name: "tech",
        prompt: "Technology/SaaS style. Dark mode, monospace fonts for code, neon accents.",
    },
    StylePreset {
        name: "reader",
        prompt: "Classic literature style. Warm beige background, high readability serif fonts, \
                 elegant margins.",
    },
    StylePreset {
        name: "business",
        prompt: "Business style. Clean white background, strong structured headers, restrained \
                 blue accents.",
    },
];

pub fn style_preset(name: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|p| p.name == name)
}

/// The design every document starts with before anything is generated.
pub fn default_design() -> DesignDescriptor {
    DesignDescriptor {
        id: "default".into(),
        theme_name: "Classic Paper".into(),
        layout_type: LayoutType::Card,
        page_background: "bg-slate-100".into(),
        container_background: "bg-white".into(),
        container_shadow: "shadow-lg".into(),
        container_max_width: "max-w-3xl".into(),
        container_padding: "p-8".into(),
        container_border_radius: "rounded-xl".into(),
        font_family: "font-sans".into(),
        base_font_size: "text-base".into(),
        line_height: "leading-relaxed".into(),
        text_color: "text-slate-800".into(),
        title_size: "text-4xl".into(),
        heading1: "font-bold mb-6 text-slate-900".into(),
        heading2: "text-2xl font-bold mt-10 mb-4 text-slate-900 border-b border-slate-200 pb-2"
            .into(),
        paragraph: "mb-5".into(),
        blockquote: "border-l-4 border-indigo-400 pl-4 italic text-slate-600 my-6".into(),
        highlight_color: "#4f46e5".into(),
        divider_style: "my-10 border-t border-slate-200".into(),
    }
}

fn wechat_design() -> DesignDescriptor {
    DesignDescriptor {
        id: "preset-wechat".into(),
        theme_name: "WeChat Green".into(),
        layout_type: LayoutType::Flat,
        page_background: "bg-white".into(),
        container_background: "bg-white".into(),
        container_shadow: "shadow-none".into(),
        container_max_width: "max-w-xl".into(),
        container_padding: "px-4 py-6".into(),
        container_border_radius: "rounded-none".into(),
        font_family: "font-sans".into(),
        base_font_size: "text-[17px]".into(),
        line_height: "leading-loose".into(),
        text_color: "text-neutral-800".into(),
        title_size: "text-3xl".into(),
        heading1: "font-bold text-center mb-8 text-neutral-900".into(),
        heading2: "inline-block text-lg font-bold text-white bg-emerald-500 rounded-full px-4 py-1 mt-8 mb-4"
            .into(),
        paragraph: "mb-4 text-justify".into(),
        blockquote: "bg-emerald-50 border-l-4 border-emerald-500 px-4 py-3 text-neutral-600 my-5"
            .into(),
        highlight_color: "#07c160".into(),
        divider_style: "my-8 border-t border-dashed border-emerald-200".into(),
    }
}

fn tech_design() -> DesignDescriptor {
    DesignDescriptor {
        id: "preset-tech".into(),
        theme_name: "Neon Terminal".into(),
        layout_type: LayoutType::MultiCard,
        page_background: "bg-slate-950".into(),
        container_background: "bg-slate-900".into(),
        container_shadow: "shadow-2xl".into(),
        container_max_width: "max-w-5xl".into(),
        container_padding: "p-6".into(),
        container_border_radius: "rounded-2xl".into(),
        font_family: "font-mono".into(),
        base_font_size: "text-sm".into(),
        line_height: "leading-relaxed".into(),
        text_color: "text-slate-200".into(),
        title_size: "text-4xl".into(),
        heading1: "font-black text-cyan-300 mb-6".into(),
        heading2: "text-xl font-bold text-fuchsia-400 border-l-4 border-fuchsia-500 pl-3 mt-8 mb-4"
            .into(),
        paragraph: "mb-4 text-slate-300".into(),
        blockquote: "border-l-2 border-cyan-400 bg-slate-800 px-4 py-2 text-cyan-100 my-4".into(),
        highlight_color: "#22d3ee".into(),
        divider_style: "my-8 border-t border-slate-700".into(),
    }
}

fn reader_design() -> DesignDescriptor {
    DesignDescriptor {
        id: "preset-reader".into(),
        theme_name: "Warm Paper".into(),
        layout_type: LayoutType::Card,
        page_background: "bg-amber-50".into(),
        container_background: "bg-orange-50".into(),
        container_shadow: "shadow-md".into(),
        container_max_width: "max-w-2xl".into(),
        container_padding: "px-10 py-12".into(),
        container_border_radius: "rounded-sm".into(),
        font_family: "font-serif".into(),
        base_font_size: "text-lg".into(),
        line_height: "leading-loose".into(),
        text_color: "text-stone-800".into(),
        title_size: "text-5xl".into(),
        heading1: "font-bold text-center italic mb-10 text-stone-900".into(),
        heading2: "text-2xl font-semibold text-center mt-12 mb-6 text-amber-900".into(),
        paragraph: "mb-6 indent-8".into(),
        blockquote: "border-l-2 border-amber-700 pl-6 italic text-stone-600 my-8".into(),
        highlight_color: "#b45309".into(),
        divider_style: "my-12 border-t border-amber-200".into(),
    }
}

fn business_design() -> DesignDescriptor {
    DesignDescriptor {
        id: "preset-business".into(),
        theme_name: "Boardroom".into(),
        layout_type: LayoutType::Card,
        page_background: "bg-gray-50".into(),
        container_background: "bg-white".into(),
        container_shadow: "shadow".into(),
        container_max_width: "max-w-4xl".into(),
        container_padding: "p-10".into(),
        container_border_radius: "rounded-lg".into(),
        font_family: "font-sans".into(),
        base_font_size: "text-base".into(),
        line_height: "leading-normal".into(),
        text_color: "text-gray-800".into(),
        title_size: "text-4xl".into(),
        heading1: "font-extrabold tracking-tight text-gray-900 mb-6".into(),
        heading2: "text-xl font-bold uppercase tracking-wide text-blue-800 border-b-2 border-blue-800 pb-1 mt-10 mb-4"
            .into(),
        paragraph: "mb-4".into(),
        blockquote: "bg-blue-50 border-l-4 border-blue-700 px-5 py-3 text-gray-700 my-6".into(),
        highlight_color: "#1d4ed8".into(),
        divider_style: "my-10 border-t border-gray-300".into(),
    }
}

/// Names accepted by [`design_preset`].
pub const DESIGN_PRESET_NAMES: &[&str] = &["default", "wechat", "tech", "reader", "business"];

/// Look up a built-in design. Selecting one replaces the current design whole.
pub fn design_preset(name: &str) -> Option<DesignDescriptor> {
    match name {
        "default" => Some(default_design()),
        "wechat" => Some(wechat_design()),
        "tech" => Some(tech_design()),
        "reader" => Some(reader_design()),
        "business" => Some(business_design()),
        _ => None,
    }
}
