use super::category::{Category, Color};
use super::item::Item;

/// Name given to a freshly added category
pub const NEW_CATEGORY_NAME: &str = "নতুন ক্যাটাগরি";
/// Colour given to a freshly added category
pub const NEW_CATEGORY_COLOR: Color = Color::Teal;
/// Name given to a freshly added top-level item
pub const NEW_ITEM_NAME: &str = "নতুন আইটেম";
/// Name given to a freshly added sub-item
pub const NEW_SUB_ITEM_NAME: &str = "নতুন সাব-আইটেম";

/// The built-in category list
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("obligatory-salat", "ফরজ সালাত", Color::Emerald),
        Category::new("sunnah-salat", "সুন্নাত/নফল সালাত", Color::Sky),
        Category::new("quran", "কুরআন", Color::Rose),
        Category::new("duas", "দু'আ ও যিকর", Color::Amber),
        Category::new("other", "অন্যান্য ইবাদাত", Color::Teal),
    ]
}

/// The built-in checklist, in display order
pub fn default_items() -> Vec<Item> {
    const SUNNAH: &str = "সুন্নাত সালাত আদায়";
    vec![
        // ফরজ সালাত
        Item::new("fajr", "ফজর", "obligatory-salat"),
        Item::new("dhuhr", "যোহর", "obligatory-salat"),
        Item::new("dhuhr-sunnah", SUNNAH, "obligatory-salat").with_parent("dhuhr"),
        Item::new("asr", "আসর", "obligatory-salat"),
        Item::new("maghrib", "মাগরিব", "obligatory-salat"),
        Item::new("maghrib-sunnah", SUNNAH, "obligatory-salat").with_parent("maghrib"),
        Item::new("isha", "ইশা", "obligatory-salat"),
        Item::new("isha-sunnah", SUNNAH, "obligatory-salat").with_parent("isha"),
        // সুন্নাত/নফল সালাত
        Item::new("duha", "চাশতের সালাত (দুহা)", "sunnah-salat"),
        Item::new("taraweeh", "তারাবীহ", "sunnah-salat"),
        // কুরআন
        Item::new("quran-reading", "দৈনিক কুরআন তিলাওয়াত", "quran"),
        Item::new("quran-tafsir", "তাফসীর / চিন্তা-ভাবনা", "quran"),
        Item::new("qiyamul-layl", "কিয়ামুল লাইল", "quran"),
        // দু'আ ও যিকর
        Item::new("morning-adhkar", "সকালের আযকার", "duas"),
        Item::new("evening-adhkar", "সন্ধ্যার আযকার", "duas"),
        Item::new("sleep-adhkar", "ঘুমানোর আগের আযকার", "duas"),
        Item::new("dua-iftar", "ইফতারের দু'আ", "duas"),
        Item::new("dua-suhoor", "সেহরির দু'আ", "duas"),
        // অন্যান্য ইবাদাত
        Item::new("sadaqah", "সদাকাহ (কমপক্ষে ৫ টাকা)", "other"),
        Item::new("istighfar", "ইস্তিগফার (১০০ বার)", "other"),
        Item::new("salawat", "নবী ﷺ এর উপর দরূদ", "other"),
        Item::new("no-backbiting", "গীবত থেকে বিরত/কম কথা বলা", "other"),
        Item::new("nazr-hifazat", "নজর হিফাজত", "other"),
    ]
}
