// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Icon rendered for any name the registry does not know.
pub const DEFAULT_ICON: &str = "CircleDot";
const DEFAULT_GLYPH: &str = "●";

static GLYPHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Briefcase", "💼"),
        ("Laptop", "💻"),
        ("TrendingUp", "📈"),
        ("TrendingDown", "📉"),
        ("Globe", "🌐"),
        ("Radio", "📻"),
        ("Plus", "＋"),
        ("Utensils", "🍴"),
        ("Car", "🚗"),
        ("Home", "🏠"),
        ("Heart", "♥"),
        ("GraduationCap", "🎓"),
        ("Gamepad2", "🎮"),
        ("ShoppingBag", "🛍"),
        ("Receipt", "🧾"),
        ("Megaphone", "📣"),
        ("Cpu", "🖥"),
        ("MoreHorizontal", "…"),
        ("LineChart", "📊"),
        ("BarChart3", "📊"),
        ("PieChart", "◔"),
        ("Bitcoin", "₿"),
        ("Lock", "🔒"),
        ("Building", "🏢"),
        (DEFAULT_ICON, DEFAULT_GLYPH),
        ("Wallet", "👛"),
        ("CreditCard", "💳"),
        ("Banknote", "💵"),
        ("PiggyBank", "🐷"),
        ("DollarSign", "$"),
        ("Target", "🎯"),
        ("Coffee", "☕"),
        ("Plane", "✈"),
        ("Gift", "🎁"),
        ("Phone", "📞"),
        ("Wifi", "📶"),
        ("Tv", "📺"),
        ("Music", "♪"),
        ("Book", "📖"),
        ("Dumbbell", "🏋"),
        ("Pill", "💊"),
        ("Scissors", "✂"),
        ("Sparkles", "✨"),
        ("Star", "★"),
        ("Zap", "⚡"),
        ("Shield", "🛡"),
    ])
});

/// Name-keyed glyph registry with a neutral default for unknown names.
pub struct IconRegistry;

impl IconRegistry {
    pub fn glyph(name: &str) -> &'static str {
        GLYPHS.get(name).copied().unwrap_or(DEFAULT_GLYPH)
    }

    pub fn is_known(name: &str) -> bool {
        GLYPHS.contains_key(name)
    }

    /// Canonical icon name: known names pass through, anything else becomes the default.
    pub fn normalize(name: &str) -> &str {
        if Self::is_known(name) {
            name
        } else {
            DEFAULT_ICON
        }
    }
}
