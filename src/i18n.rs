//! Typed translations for the three site languages.
//!
//! Every string the generator renders is a [`TextKey`] variant. [`t`] resolves
//! a key through an exhaustive `match` that yields one entry per [`Locale`], so
//! adding a key without translating it, or adding a locale without extending
//! every entry, fails to compile. There is no runtime fallback.
//!
//! Dates are localized here too: [`format_display_date`] renders the long form
//! used on post pages and cards.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ru,
    Uz,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ru, Locale::Uz];

    /// Two-letter code used in URLs and file suffixes.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Uz => "uz",
        }
    }

    /// Name of the language in that language, for the language switcher.
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ru => "Русский",
            Locale::Uz => "O'zbek",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown locale '{}' (expected en, ru or uz)", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "uz" => Ok(Locale::Uz),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// UI strings rendered by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Home,
    Products,
    Production,
    Blog,
    Contact,
    Language,
    ShippingInfo,
    BusinessHours,
    HeroTitle,
    HeroSubtitle,
    ExploreFabrics,
    OurPremiumFabrics,
    ProductsDescription,
    Previous,
    Next,
    TextileInsights,
    BlogHeroDescription,
    LatestArticles,
    All,
    Featured,
    ReadMore,
    ReadArticle,
    MinRead,
    Author,
    Tags,
    NoArticlesAvailable,
    NoArticlesCategory,
    RelatedArticles,
    BackToBlog,
    CompanyDescription,
    CraftedWithTradition,
    AllRightsReserved,
}

impl TextKey {
    pub const ALL: [TextKey; 32] = [
        TextKey::Home,
        TextKey::Products,
        TextKey::Production,
        TextKey::Blog,
        TextKey::Contact,
        TextKey::Language,
        TextKey::ShippingInfo,
        TextKey::BusinessHours,
        TextKey::HeroTitle,
        TextKey::HeroSubtitle,
        TextKey::ExploreFabrics,
        TextKey::OurPremiumFabrics,
        TextKey::ProductsDescription,
        TextKey::Previous,
        TextKey::Next,
        TextKey::TextileInsights,
        TextKey::BlogHeroDescription,
        TextKey::LatestArticles,
        TextKey::All,
        TextKey::Featured,
        TextKey::ReadMore,
        TextKey::ReadArticle,
        TextKey::MinRead,
        TextKey::Author,
        TextKey::Tags,
        TextKey::NoArticlesAvailable,
        TextKey::NoArticlesCategory,
        TextKey::RelatedArticles,
        TextKey::BackToBlog,
        TextKey::CompanyDescription,
        TextKey::CraftedWithTradition,
        TextKey::AllRightsReserved,
    ];
}

/// Entries are ordered `[en, ru, uz]`, matching `Locale` discriminants.
fn entry(key: TextKey) -> [&'static str; 3] {
    match key {
        TextKey::Home => ["Home", "Главная", "Bosh sahifa"],
        TextKey::Products => ["Our Products", "Наши Продукты", "Mahsulotlarimiz"],
        TextKey::Production => ["Production", "Производство", "Ishlab chiqarish"],
        TextKey::Blog => ["Blog", "Блог", "Blog"],
        TextKey::Contact => ["Contact", "Контакты", "Aloqa"],
        TextKey::Language => ["Language", "Язык", "Til"],
        TextKey::ShippingInfo => [
            "We ship across Central Asia and Europe",
            "Мы доставляем по Центральной Азии и Европе",
            "Biz Markaziy Osiyo va Yevropa bo'ylab yetkazib beramiz",
        ],
        TextKey::BusinessHours => [
            "Mon-Sat: 9:00-18:00",
            "Пн-Сб: 9:00-18:00",
            "Du-Sha: 9:00-18:00",
        ],
        TextKey::HeroTitle => [
            "Uzbekistan's Trusted Fabric Supplier",
            "Надежный поставщик тканей из Узбекистана",
            "O'zbekistonning ishonchli mato yetkazib beruvchisi",
        ],
        TextKey::HeroSubtitle => [
            "Discover quality textiles crafted with tradition and care. Supplying premium Knit, Flat Knit, Lace, and Crochet fabrics across Central Asia and Europe.",
            "Откройте для себя качественный текстиль, созданный с традициями и заботой. Поставляем премиальные трикотажные, плоские, кружевные и вязаные ткани по Центральной Азии и Европе.",
            "An'ana va g'amxo'rlik bilan yaratilgan sifatli to'qimachilikni kashf eting. Markaziy Osiyo va Yevropa bo'ylab yuqori sifatli trikotaj, tekis trikotaj, to'r va toquv matolarini yetkazib beramiz.",
        ],
        TextKey::ExploreFabrics => [
            "Explore Our Fabrics",
            "Изучить Наши Ткани",
            "Matolarimizni o'rganing",
        ],
        TextKey::OurPremiumFabrics => [
            "Our Premium Fabrics",
            "Наши Премиальные Ткани",
            "Bizning yuqori sifatli matolarimiz",
        ],
        TextKey::ProductsDescription => [
            "Discover our extensive collection of high-quality textiles, each crafted with traditional Uzbek techniques and modern precision.",
            "Откройте для себя нашу обширную коллекцию высококачественного текстиля, созданного с традиционными узбекскими техниками и современной точностью.",
            "An'anaviy o'zbek texnikasi va zamonaviy aniqlik bilan yaratilgan yuqori sifatli to'qimachilik kolleksiyamizni kashf eting.",
        ],
        TextKey::Previous => ["Previous", "Назад", "Oldingi"],
        TextKey::Next => ["Next", "Далее", "Keyingi"],
        TextKey::TextileInsights => [
            "Textile Insights & News",
            "Новости и Аналитика Текстиля",
            "To'qimachilik yangiliklari va tahlillari",
        ],
        TextKey::BlogHeroDescription => [
            "Stay updated with industry trends, company news, and textile innovations",
            "Будьте в курсе отраслевых трендов, новостей компании и текстильных инноваций",
            "Sanoat tendentsiyalari, kompaniya yangiliklari va to'qimachilik innovatsiyalari bilan tanishib turing",
        ],
        TextKey::LatestArticles => ["Latest Articles", "Последние Статьи", "So'nggi maqolalar"],
        TextKey::All => ["All", "Все", "Hammasi"],
        TextKey::Featured => ["Featured", "Рекомендуемые", "Tavsiya etilgan"],
        TextKey::ReadMore => ["Read More", "Читать Далее", "Davomini o'qish"],
        TextKey::ReadArticle => ["Read Article", "Читать Статью", "Maqolani o'qish"],
        TextKey::MinRead => ["min read", "мин чтения", "daqiqa o'qish"],
        TextKey::Author => ["Author", "Автор", "Muallif"],
        TextKey::Tags => ["Tags", "Теги", "Teglar"],
        TextKey::NoArticlesAvailable => [
            "No articles available",
            "Статьи недоступны",
            "Maqolalar mavjud emas",
        ],
        TextKey::NoArticlesCategory => [
            "No articles in",
            "Нет статей в категории",
            "Kategoriyada maqolalar yo'q",
        ],
        TextKey::RelatedArticles => [
            "Related Articles",
            "Похожие Статьи",
            "Tegishli maqolalar",
        ],
        TextKey::BackToBlog => ["Back to Blog", "Назад к Блогу", "Blogga qaytish"],
        TextKey::CompanyDescription => [
            "Aknazar Textile is a premium fabric supplier based in Uzbekistan, specializing in traditional craftsmanship and modern quality standards.",
            "Aknazar Textile - премиальный поставщик тканей из Узбекистана, специализирующийся на традиционном мастерстве и современных стандартах качества.",
            "Aknazar Textile - O'zbekistonda joylashgan yuqori sifatli mato yetkazib beruvchi, an'anaviy hunarmandchilik va zamonaviy sifat standartlariga ixtisoslashgan.",
        ],
        TextKey::CraftedWithTradition => [
            "Crafted with tradition in Uzbekistan",
            "Создано с традициями в Узбекистане",
            "O'zbekistonda an'ana bilan yaratilgan",
        ],
        TextKey::AllRightsReserved => [
            "© 2025 Aknazar Textile. All rights reserved.",
            "© 2025 Aknazar Textile. Все права защищены.",
            "© 2025 Aknazar Textile. Barcha huquqlar himoyalangan.",
        ],
    }
}

/// Translate a UI string.
pub fn t(locale: Locale, key: TextKey) -> &'static str {
    entry(key)[locale.index()]
}

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Genitive forms, as used after a day number.
const MONTHS_RU: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const MONTHS_UZ: [&str; 12] = [
    "yanvar", "fevral", "mart", "aprel", "may", "iyun", "iyul", "avgust", "sentabr", "oktabr",
    "noyabr", "dekabr",
];

/// Render a date in the long form for `locale`.
///
/// - en: `January 15, 2025`
/// - ru: `15 января 2025 г.`
/// - uz: `15-yanvar, 2025`
pub fn format_display_date(date: NaiveDate, locale: Locale) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::En => format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year()),
        Locale::Ru => format!("{} {} {} г.", date.day(), MONTHS_RU[month], date.year()),
        Locale::Uz => format!("{}-{}, {}", date.day(), MONTHS_UZ[month], date.year()),
    }
}

/// Like [`format_display_date`] but for an ISO `YYYY-MM-DD` string.
///
/// Input that does not parse is returned unchanged.
pub fn format_iso_date(iso: &str, locale: Locale) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => format_display_date(date, locale),
        Err(e) => {
            log::debug!("not an ISO date {iso:?}: {e}");
            iso.to_string()
        }
    }
}

/// A value with optional per-locale overrides.
///
/// Lookups fall back to the default value when a locale has no override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub default: T,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<Locale, T>,
}

impl<T> Localized<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with(mut self, locale: Locale, value: T) -> Self {
        self.overrides.insert(locale, value);
        self
    }

    pub fn get(&self, locale: Locale) -> &T {
        self.overrides.get(&locale).unwrap_or(&self.default)
    }
}
