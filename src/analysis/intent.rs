use serde::{Deserialize, Serialize};
use std::fmt;

/// What a commenter is asking about or expressing.
///
/// Declaration order is the detection priority order: when several intents
/// match, the first one listed here becomes the primary intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PriceInquiry,
    Availability,
    SizeQuestion,
    ColorQuestion,
    ShippingInquiry,
    PaymentQuestion,
    ReturnQuestion,
    OrderIntent,
    Praise,
    Interest,
    Confusion,
    Negative,
    Negotiation,
    /// Nothing in the keyword table matched
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::PriceInquiry => "price_inquiry",
            Intent::Availability => "availability",
            Intent::SizeQuestion => "size_question",
            Intent::ColorQuestion => "color_question",
            Intent::ShippingInquiry => "shipping_inquiry",
            Intent::PaymentQuestion => "payment_question",
            Intent::ReturnQuestion => "return_question",
            Intent::OrderIntent => "order_intent",
            Intent::Praise => "praise",
            Intent::Interest => "interest",
            Intent::Confusion => "confusion",
            Intent::Negative => "negative",
            Intent::Negotiation => "negotiation",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct IntentRule {
    intent: Intent,
    /// Matched anywhere in the lower-cased comment.
    phrases: &'static [&'static str],
    /// Matched only as a standalone word (bare size labels would otherwise
    /// hit nearly every comment).
    words: &'static [&'static str],
}

const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::PriceInquiry,
        phrases: &[
            "combien", "prix", "price", "how much", "كم", "بشحال", "قداش",
            "cout", "coute", "tarif", "سعر", "ثمن", "cost", "coûte",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::Availability,
        phrases: &[
            "stock", "disponible", "available", "dispo", "موجود", "فما",
            "avez-vous", "reste", "en stock", "still have", "فيه", "عندكم",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::SizeQuestion,
        phrases: &[
            "taille", "size", "قياس", "مقاس", "mesure", "pointure",
            "tailles disponibles", "sizes available",
        ],
        words: &["s", "m", "l", "xl", "xxl"],
    },
    IntentRule {
        intent: Intent::ColorQuestion,
        phrases: &[
            "couleur", "color", "لون", "noir", "blanc", "rouge", "bleu",
            "vert", "rose", "beige", "كحل", "ابيض", "احمر", "أزرق",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::ShippingInquiry,
        phrases: &[
            "livraison", "delivery", "توصيل", "shipping", "délai", "يوصل",
            "expédition", "envoyer", "تبعثو", "توصلو", "deliver", "send",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::PaymentQuestion,
        phrases: &[
            "paiement", "payment", "خلاص", "cod", "payer", "carte", "virement",
            "d17", "نخلص", "كيفاش نخلص", "how to pay", "دفع",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::ReturnQuestion,
        phrases: &[
            "retour", "échange", "return", "ترجيع", "exchange", "rembours",
            "نرجع", "تبديل", "changer", "refund",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::OrderIntent,
        phrases: &[
            "commander", "acheter", "order", "buy", "نشري", "نحب",
            "je veux", "i want", "intéressé", "نكومندي", "نوخذ", "take",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::Praise,
        phrases: &[
            "beau", "magnifique", "superbe", "love", "beautiful", "amazing",
            "جميل", "روعة", "parfait", "top", "bravo", "wow", "😍", "❤️",
            "💕", "🔥", "gorgeous", "stunning", "fantastic",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::Interest,
        phrases: &[
            "interested", "intéressé", "مهتم", "want to know", "tell me more",
            "curieux", "je veux savoir",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::Confusion,
        phrases: &[
            "comprends pas", "don't understand", "ما فهمت", "comment",
            "how", "كيفاش", "explain", "explique", "c'est quoi", "شنو هذا",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::Negative,
        phrases: &[
            "cher", "expensive", "غالي", "nul", "mauvais", "bad",
            "arnaque", "scam", "مشكل", "problème", "problem",
        ],
        words: &[],
    },
    IntentRule {
        intent: Intent::Negotiation,
        phrases: &[
            "moins cher", "نقص", "discount", "réduction", "promo",
            "meilleur prix", "better price", "نقص شوي", "بركة",
        ],
        words: &[],
    },
];

/// Classify a comment against the keyword table.
///
/// Returns every matching intent in table order, or `[General]` when nothing
/// matches. The first element is the primary intent: first table hit wins,
/// there is no scoring.
pub fn detect_intents(comment_text: &str) -> Vec<Intent> {
    let lowered = comment_text.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() || c == '؟' || c == '،'))
        .filter(|w| !w.is_empty())
        .collect();

    let detected: Vec<Intent> = RULES
        .iter()
        .filter(|rule| {
            rule.phrases.iter().any(|p| lowered.contains(p))
                || rule.words.iter().any(|w| words.contains(w))
        })
        .map(|rule| rule.intent)
        .collect();

    if detected.is_empty() {
        vec![Intent::General]
    } else {
        detected
    }
}
