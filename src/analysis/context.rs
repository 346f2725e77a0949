//! Renders the seller knowledge base into the text block injected into the
//! reply prompt.
//!
//! Only data that is actually present gets rendered. A missing price or
//! shipping cost is left out rather than defaulted, so the model has nothing
//! to repeat back that the seller did not provide.

use super::types::{ColorOption, Language, ProductContext, SellerContext, ShippingInfo, StockStatus};

const FAQ_LIMIT: usize = 2;
const FAQ_ANSWER_MAX_CHARS: usize = 100;

/// Labels and connectors for one script. Selection logic is shared.
struct Labels {
    no_context: &'static str,
    limited_context: &'static str,
    company: &'static str,
    product: &'static str,
    unnamed_product: &'static str,
    price: &'static str,
    was: &'static str,
    sizes: &'static str,
    colors: &'static str,
    stock: &'static str,
    stock_missing: &'static str,
    shipping: &'static str,
    default_zone: &'static str,
    default_delay: &'static str,
    money_unit: &'static str,
    delay_connector: &'static str,
    free_from: &'static str,
    payment: &'static str,
    returns: &'static str,
    promotions: &'static str,
    default_promo: &'static str,
    faq: &'static str,
    style: &'static str,
    sentences: &'static str,
}

const LATIN: Labels = Labels {
    no_context: "❌ Aucune information vendeur disponible. Utilise uniquement le contexte visuel.",
    limited_context: "⚠️ Contexte limité. Utilise principalement le contexte visuel.",
    company: "🏪 Entreprise",
    product: "📦 Produit",
    unnamed_product: "Non identifié",
    price: "💰 Prix",
    was: "au lieu de",
    sizes: "📐 Tailles",
    colors: "🎨 Couleurs dispo",
    stock: "Stock",
    stock_missing: "Inconnu",
    shipping: "🚚 Livraison",
    default_zone: "Toute Tunisie",
    default_delay: "2-5 jours",
    money_unit: "DT",
    delay_connector: "en",
    free_from: "🆓 Gratuit à partir de",
    payment: "💳 Paiement",
    returns: "🔄 Retours",
    promotions: "🎁 Promotions actives:",
    default_promo: "Promo",
    faq: "❓ FAQ pertinentes:",
    style: "🎨 Style",
    sentences: "phrases",
};

const ARABIC: Labels = Labels {
    no_context: "❌ ما فماش معلومات على البزنس. استعمل الكونتكست البصري فقط.",
    limited_context: "⚠️ معلومات محدودة. استعمل الكونتكست البصري.",
    company: "🏪 الشركة",
    product: "📦 المنتج",
    unnamed_product: "غير محدد",
    price: "💰 السعر",
    was: "بدل",
    sizes: "📐 المقاسات",
    colors: "🎨 الألوان المتوفرة",
    stock: "الستوك",
    stock_missing: "غير معروف",
    shipping: "🚚 التوصيل",
    default_zone: "كل تونس",
    default_delay: "2-5 أيام",
    money_unit: "دينار",
    delay_connector: "في",
    free_from: "🆓 توصيل مجاني من",
    payment: "💳 طرق الخلاص",
    returns: "🔄 سياسة الترجيع",
    promotions: "🎁 العروض النشطة:",
    default_promo: "Promo",
    faq: "❓ أجوبة FAQ:",
    style: "🎨 ستايل الجواب",
    sentences: "جمل",
};

/// Render the seller context for `language`.
///
/// Never returns an empty string: an absent context and a context with no
/// usable field each render a fixed sentence telling the model to rely on
/// the post image.
pub fn render_seller_context(ctx: Option<&SellerContext>, language: Language) -> String {
    let labels = if language.is_arabic_script() { &ARABIC } else { &LATIN };

    let Some(ctx) = ctx else {
        return labels.no_context.to_string();
    };

    let mut lines: Vec<String> = Vec::new();

    if let Some(name) = non_blank(&ctx.company_name) {
        let mut line = format!("{}: {}", labels.company, name);
        if let Some(handle) = non_blank(&ctx.instagram_handle) {
            line.push_str(&format!(" ({})", handle));
        }
        if let Some(kind) = non_blank(&ctx.business_type) {
            line.push_str(&format!(" - {}", kind));
        }
        lines.push(line);
    }

    if let Some(product) = &ctx.product_context {
        render_product(product, language, labels, &mut lines);
    }

    if let Some(shipping) = &ctx.shipping {
        render_shipping(shipping, labels, &mut lines);
    }

    if !ctx.payment_methods.is_empty() {
        lines.push(format!("{}: {}", labels.payment, ctx.payment_methods.join(", ")));
    }

    if let Some(policy) = non_blank(&ctx.return_policy) {
        lines.push(format!("{}: {}", labels.returns, policy));
    }

    if !ctx.active_promotions.is_empty() {
        lines.push(labels.promotions.to_string());
        for promo in &ctx.active_promotions {
            lines.push(format!(
                "   • {}: {}",
                promo.name.as_deref().unwrap_or(labels.default_promo),
                promo.discount.as_deref().unwrap_or_default()
            ));
        }
    }

    if !ctx.faq_matches.is_empty() {
        lines.push(labels.faq.to_string());
        for faq in ctx.faq_matches.iter().take(FAQ_LIMIT) {
            let answer: String = faq.answer.chars().take(FAQ_ANSWER_MAX_CHARS).collect();
            lines.push(format!("   → {}", answer));
        }
    }

    if let Some(voice) = &ctx.brand_voice {
        lines.push(format!(
            "{}: {}, max {} {}, emojis: {}",
            labels.style,
            voice.tone,
            voice.max_sentences,
            labels.sentences,
            voice.emoji_usage.as_str()
        ));
    }

    if lines.is_empty() {
        return labels.limited_context.to_string();
    }

    lines.join("\n")
}

/// Empty or whitespace-only text counts as absent.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn render_product(product: &ProductContext, language: Language, labels: &Labels, lines: &mut Vec<String>) {
    let name = if language.is_arabic_script() {
        product.product_name_ar.as_deref().or(product.product_name.as_deref())
    } else {
        product.product_name.as_deref()
    };
    lines.push(format!("{}: {}", labels.product, name.unwrap_or(labels.unnamed_product)));

    let currency = &product.currency;
    let price = match (product.sale_price, product.regular_price) {
        (Some(sale), Some(regular)) => Some(format!(
            "{} {} ({} {})",
            format_amount(sale),
            currency,
            labels.was,
            format_amount(regular)
        )),
        (Some(single), None) | (None, Some(single)) => {
            Some(format!("{} {}", format_amount(single), currency))
        }
        (None, None) => None,
    };
    if let Some(price) = price {
        lines.push(format!("   {}: {}", labels.price, price));
    }

    if !product.sizes_available.is_empty() {
        lines.push(format!("   {}: {}", labels.sizes, product.sizes_available.join(", ")));
    }

    let colors = available_colors(&product.colors_available);
    if !colors.is_empty() {
        lines.push(format!("   {}: {}", labels.colors, colors.join(", ")));
    }

    let stock_label = product
        .stock_status
        .map(|s| s.as_str())
        .unwrap_or(labels.stock_missing);
    lines.push(format!(
        "   {} {}: {}",
        stock_symbol(product.stock_status),
        labels.stock,
        stock_label
    ));
}

fn render_shipping(shipping: &ShippingInfo, labels: &Labels, lines: &mut Vec<String>) {
    let zone = shipping.zone.as_deref().unwrap_or(labels.default_zone);
    let delay = shipping.time.as_deref().unwrap_or(labels.default_delay);

    let line = match shipping.cost {
        Some(cost) => format!(
            "{}: {} - {} {} {} {}",
            labels.shipping,
            zone,
            format_amount(cost),
            labels.money_unit,
            labels.delay_connector,
            delay
        ),
        None => format!("{}: {} - {}", labels.shipping, zone, delay),
    };
    lines.push(line);

    if let Some(threshold) = shipping.free_above {
        lines.push(format!(
            "   {} {} {}",
            labels.free_from,
            format_amount(threshold),
            labels.money_unit
        ));
    }
}

fn available_colors(colors: &[ColorOption]) -> Vec<&str> {
    colors
        .iter()
        .filter(|c| c.available)
        .map(|c| c.name.as_str())
        .collect()
}

fn stock_symbol(status: Option<StockStatus>) -> &'static str {
    match status {
        Some(StockStatus::InStock) => "✅",
        Some(StockStatus::LowStock) => "⚠️",
        Some(StockStatus::OutOfStock) => "❌",
        Some(StockStatus::Unknown) | None => "❓",
    }
}

/// Whole amounts print without decimals (69, not 69.0).
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{BrandVoiceConfig, FaqMatch, Promotion};

    fn robe() -> ProductContext {
        ProductContext {
            product_name: Some("Robe Élégance".into()),
            product_name_ar: Some("روب أناقة".into()),
            sale_price: Some(69.0),
            regular_price: Some(89.0),
            currency: "TND".into(),
            sizes_available: vec!["S".into(), "M".into(), "L".into()],
            colors_available: vec![
                ColorOption { name: "noir".into(), available: true },
                ColorOption { name: "rouge".into(), available: false },
                ColorOption { name: "beige".into(), available: true },
            ],
            stock_status: Some(StockStatus::InStock),
            ..Default::default()
        }
    }

    #[test]
    fn absent_context_renders_fallback_sentence() {
        assert_eq!(render_seller_context(None, Language::French), LATIN.no_context);
        assert_eq!(render_seller_context(None, Language::English), LATIN.no_context);
        assert_eq!(render_seller_context(None, Language::Tunisian), ARABIC.no_context);
        assert_eq!(render_seller_context(None, Language::Arabic), ARABIC.no_context);
    }

    #[test]
    fn empty_context_renders_limited_sentence() {
        let ctx = SellerContext::default();
        assert_eq!(render_seller_context(Some(&ctx), Language::French), LATIN.limited_context);
        assert_eq!(render_seller_context(Some(&ctx), Language::Tunisian), ARABIC.limited_context);
    }

    #[test]
    fn blank_text_fields_count_as_absent() {
        let ctx = SellerContext {
            company_name: Some(String::new()),
            instagram_handle: Some("@chic.tn".into()),
            business_type: Some("  ".into()),
            return_policy: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(render_seller_context(Some(&ctx), Language::French), LATIN.limited_context);

        let ctx = SellerContext {
            company_name: Some("Chic Boutique".into()),
            instagram_handle: Some(String::new()),
            business_type: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(render_seller_context(Some(&ctx), Language::French), "🏪 Entreprise: Chic Boutique");
    }

    #[test]
    fn product_block_in_french() {
        let ctx = SellerContext {
            product_context: Some(robe()),
            ..Default::default()
        };
        let text = render_seller_context(Some(&ctx), Language::French);
        assert_eq!(
            text,
            "📦 Produit: Robe Élégance\n   💰 Prix: 69 TND (au lieu de 89)\n   📐 Tailles: S, M, L\n   🎨 Couleurs dispo: noir, beige\n   ✅ Stock: in_stock"
        );
    }

    #[test]
    fn product_block_in_arabic_prefers_localized_name() {
        let ctx = SellerContext {
            product_context: Some(robe()),
            ..Default::default()
        };
        let text = render_seller_context(Some(&ctx), Language::Tunisian);
        assert!(text.starts_with("📦 المنتج: روب أناقة"));
        assert!(text.contains("69 TND (بدل 89)"));
        assert!(!text.contains("rouge"));
    }

    #[test]
    fn missing_stock_status_is_not_out_of_stock() {
        let ctx = SellerContext {
            product_context: Some(ProductContext::default()),
            ..Default::default()
        };
        let text = render_seller_context(Some(&ctx), Language::French);
        assert!(text.contains("❓ Stock: Inconnu"));
        assert!(!text.contains("❌"));
        assert!(!text.contains("Prix"));
        assert!(text.contains("Non identifié"));
    }

    #[test]
    fn single_price_and_zero_price_render() {
        let mut product = ProductContext {
            regular_price: Some(49.5),
            ..Default::default()
        };
        let ctx = SellerContext { product_context: Some(product.clone()), ..Default::default() };
        assert!(render_seller_context(Some(&ctx), Language::French).contains("💰 Prix: 49.5 TND"));

        product.regular_price = Some(0.0);
        let ctx = SellerContext { product_context: Some(product), ..Default::default() };
        assert!(render_seller_context(Some(&ctx), Language::French).contains("💰 Prix: 0 TND"));
    }

    #[test]
    fn shipping_defaults_only_for_zone_and_delay() {
        let ctx = SellerContext {
            shipping: Some(ShippingInfo::default()),
            ..Default::default()
        };
        assert_eq!(
            render_seller_context(Some(&ctx), Language::French),
            "🚚 Livraison: Toute Tunisie - 2-5 jours"
        );

        let ctx = SellerContext {
            shipping: Some(ShippingInfo {
                zone: Some("Sfax".into()),
                cost: Some(7.0),
                time: Some("48h".into()),
                free_above: Some(150.0),
            }),
            ..Default::default()
        };
        assert_eq!(
            render_seller_context(Some(&ctx), Language::French),
            "🚚 Livraison: Sfax - 7 DT en 48h\n   🆓 Gratuit à partir de 150 DT"
        );
        assert_eq!(
            render_seller_context(Some(&ctx), Language::Arabic),
            "🚚 التوصيل: Sfax - 7 دينار في 48h\n   🆓 توصيل مجاني من 150 دينار"
        );
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let ctx = SellerContext {
            company_name: Some("Chic Boutique".into()),
            instagram_handle: Some("@chic.tn".into()),
            product_context: Some(robe()),
            shipping: Some(ShippingInfo::default()),
            payment_methods: vec!["COD".into(), "D17".into()],
            return_policy: Some("Échange sous 7 jours".into()),
            active_promotions: vec![Promotion {
                name: Some("Soldes".into()),
                discount: Some("-20%".into()),
                ..Default::default()
            }],
            faq_matches: vec![FaqMatch { question: "Q".into(), answer: "R".into() }],
            brand_voice: Some(BrandVoiceConfig::default()),
            ..Default::default()
        };
        let text = render_seller_context(Some(&ctx), Language::French);

        let order = [
            "🏪 Entreprise: Chic Boutique (@chic.tn)",
            "📦 Produit",
            "🚚 Livraison",
            "💳 Paiement: COD, D17",
            "🔄 Retours: Échange sous 7 jours",
            "🎁 Promotions actives:",
            "   • Soldes: -20%",
            "❓ FAQ pertinentes:",
            "🎨 Style: professional_friendly, max 2 phrases, emojis: minimal",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn faq_keeps_two_entries_and_truncates_answers() {
        let long_answer = "é".repeat(150);
        let ctx = SellerContext {
            faq_matches: vec![
                FaqMatch { question: "a".into(), answer: long_answer },
                FaqMatch { question: "b".into(), answer: "second".into() },
                FaqMatch { question: "c".into(), answer: "third".into() },
            ],
            ..Default::default()
        };
        let text = render_seller_context(Some(&ctx), Language::French);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("   → {}", "é".repeat(100)));
        assert_eq!(lines[2], "   → second");
        assert!(!text.contains("third"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctx = SellerContext {
            product_context: Some(robe()),
            payment_methods: vec!["COD".into()],
            ..Default::default()
        };
        assert_eq!(
            render_seller_context(Some(&ctx), Language::French),
            render_seller_context(Some(&ctx), Language::French)
        );
    }
}
