//! Okurigana inflection rules and the hiragana word list.
//!
//! Rules map the kana written after a kanji stem to a part of speech and the
//! kana of the dictionary form, e.g. `かった` after `速` is an adjective whose
//! base form ends in `い`. Adjective readings and the verb forms that look like
//! particles only apply after a listed stem.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::domain::types::PartOfSpeech;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflection {
    pub ending: String,
    pub part_of_speech: PartOfSpeech,
    pub base: String,
}

impl Inflection {
    fn new(ending: impl Into<String>, part_of_speech: PartOfSpeech, base: impl Into<String>) -> Self {
        Self {
            ending: ending.into(),
            part_of_speech,
            base: base.into(),
        }
    }
}

/// (ending, base kana) for i-adjectives, written after a stem that already
/// includes any `し`/`き`/`さ` (`美し`, `大き`, `おいし`).
const ADJECTIVE_ENDINGS: &[(&str, &str)] = &[
    ("くなかった", "い"),
    ("かった", "い"),
    ("くない", "い"),
    ("ければ", "い"),
    ("くて", "い"),
    ("く", "い"),
    ("い", "い"),
];

/// One godan conjugation row.
#[derive(Debug)]
pub struct GodanRow {
    dict: &'static str,
    i_stem: &'static str,
    a_stem: &'static str,
    ta: &'static str,
    te: &'static str,
}

const fn row(
    dict: &'static str,
    i_stem: &'static str,
    a_stem: &'static str,
    ta: &'static str,
    te: &'static str,
) -> GodanRow {
    GodanRow {
        dict,
        i_stem,
        a_stem,
        ta,
        te,
    }
}

const U: GodanRow = row("う", "い", "わ", "った", "って");
const KU: GodanRow = row("く", "き", "か", "いた", "いて");
const GU: GodanRow = row("ぐ", "ぎ", "が", "いだ", "いで");
const SU: GodanRow = row("す", "し", "さ", "した", "して");
const TSU: GodanRow = row("つ", "ち", "た", "った", "って");
const NU: GodanRow = row("ぬ", "に", "な", "んだ", "んで");
const BU: GodanRow = row("ぶ", "び", "ば", "んだ", "んで");
const MU: GodanRow = row("む", "み", "ま", "んだ", "んで");
const RU: GodanRow = row("る", "り", "ら", "った", "って");
/// 行く takes った/って.
const IKU: GodanRow = row("く", "き", "か", "った", "って");

/// Earlier rows win shared endings: `んだ` after an unlisted stem reads as む.
const GODAN_ROWS: &[&GodanRow] = &[&U, &KU, &GU, &SU, &TSU, &MU, &NU, &BU, &RU];

/// Forms starting with these kana collide with particles and auxiliaries
/// after a noun (`東京って`, `猫いる`, `意味がない`), so they need a known stem.
const AMBIGUOUS_AFTER_NOUN: &[&str] = &["っ", "い", "が"];

const POLITE_SUFFIXES: &[&str] = &["ます", "ました", "ません", "たい"];
const NEGATIVE_SUFFIXES: &[&str] = &["ない", "なかった"];
const ICHIDAN_STEMS: &[&str] = &["え", "け", "げ", "せ", "て", "ね", "べ", "め", "れ"];
const ICHIDAN_SUFFIXES: &[&str] = &["る", "ます", "ました", "ません", "ない", "なかった", "た", "て", "たい"];

/// Kana that start suru-verb forms (`勉強して`, `確認します`).
pub const SURU_PREFIXES: &[&str] = &["し", "さ", "す", "せ"];

/// Kanji i-adjective stems, with the kana that belongs to the stem.
pub const KANJI_ADJECTIVE_STEMS: &[&str] = &[
    "速", "早", "高", "安", "長", "短", "強", "弱", "多", "少な", "暑", "寒", "熱", "冷た", "重", "軽",
    "白", "黒", "赤", "青", "若", "古", "遠", "近", "広", "狭", "明る", "暗", "深", "浅", "辛", "甘",
    "痛", "怖", "眠", "面白", "可愛", "凄", "良", "悪", "遅", "太", "細", "丸", "固", "硬", "汚", "旨",
    "偉", "酷", "危な", "温か", "暖か", "柔らか", "大き", "小さ", "美味", "美味し", "美し", "新し",
    "楽し", "嬉し", "悲し", "寂し", "難し", "優し", "恥ずかし", "懐かし", "忙し", "正し", "詳し",
    "珍し", "激し", "厳し", "眩し", "羨まし", "素晴らし", "欲し", "悔し", "苦し", "怪し", "親し",
];

/// Kanji godan verb stems whose te/ta and i-row forms are otherwise ambiguous.
pub const KANJI_GODAN_VERBS: &[(&str, &GodanRow)] = &[
    ("言", &U), ("買", &U), ("会", &U), ("思", &U), ("使", &U), ("歌", &U), ("笑", &U), ("違", &U),
    ("払", &U), ("習", &U), ("洗", &U), ("吸", &U), ("拾", &U), ("貰", &U), ("手伝", &U), ("戦", &U),
    ("誘", &U), ("願", &U), ("迷", &U), ("酔", &U),
    ("持", &TSU), ("待", &TSU), ("立", &TSU), ("勝", &TSU), ("打", &TSU), ("育", &TSU),
    ("走", &RU), ("取", &RU), ("知", &RU), ("帰", &RU), ("入", &RU), ("切", &RU), ("乗", &RU),
    ("終わ", &RU), ("座", &RU), ("送", &RU), ("売", &RU), ("分か", &RU), ("始ま", &RU), ("決ま", &RU),
    ("頑張", &RU), ("撮", &RU), ("困", &RU), ("怒", &RU), ("触", &RU), ("祈", &RU), ("戻", &RU),
    ("作", &RU), ("守", &RU), ("踊", &RU), ("残", &RU), ("降", &RU), ("登", &RU), ("光", &RU),
    ("太", &RU), ("曲が", &RU), ("上が", &RU), ("下が", &RU), ("変わ", &RU), ("止ま", &RU),
    ("集ま", &RU), ("眠", &RU), ("喋", &RU), ("渡", &RU), ("通", &RU), ("回", &RU),
    ("書", &KU), ("聞", &KU), ("歩", &KU), ("働", &KU), ("泣", &KU), ("置", &KU), ("描", &KU),
    ("咲", &KU), ("引", &KU), ("驚", &KU), ("開", &KU), ("動", &KU), ("届", &KU), ("続", &KU),
    ("弾", &KU), ("焼", &KU), ("磨", &KU), ("履", &KU), ("抱", &KU), ("輝", &KU), ("吹", &KU),
    ("効", &KU), ("巻", &KU), ("頂", &KU), ("聴", &KU),
    ("行", &IKU),
    ("泳", &GU), ("急", &GU), ("脱", &GU), ("騒", &GU), ("稼", &GU), ("防", &GU), ("注", &GU),
];

fn row_forms(row: &GodanRow) -> Vec<Inflection> {
    let mut rules = vec![
        Inflection::new(row.dict, PartOfSpeech::Verb, row.dict),
        Inflection::new(row.ta, PartOfSpeech::Verb, row.dict),
        Inflection::new(row.te, PartOfSpeech::Verb, row.dict),
    ];
    for suffix in POLITE_SUFFIXES {
        rules.push(Inflection::new(format!("{}{suffix}", row.i_stem), PartOfSpeech::Verb, row.dict));
    }
    for suffix in NEGATIVE_SUFFIXES {
        rules.push(Inflection::new(format!("{}{suffix}", row.a_stem), PartOfSpeech::Verb, row.dict));
    }
    rules
}

/// Every form of one row, longest first. Only used after a known stem.
pub fn godan_inflections(row: &GodanRow) -> Vec<Inflection> {
    dedup_longest_first(row_forms(row))
}

/// Rules applied after an unknown kanji run, longest ending first. Only verb
/// forms that cannot be mistaken for a particle or auxiliary are kept.
pub fn kanji_inflections() -> &'static [Inflection] {
    static RULES: OnceLock<Vec<Inflection>> = OnceLock::new();
    RULES.get_or_init(|| {
        let mut rules: Vec<Inflection> = GODAN_ROWS
            .iter()
            .flat_map(|row| row_forms(row))
            .filter(|rule| !AMBIGUOUS_AFTER_NOUN.iter().any(|kana| rule.ending.starts_with(kana)))
            .collect();
        for stem in ICHIDAN_STEMS {
            for suffix in ICHIDAN_SUFFIXES {
                rules.push(Inflection::new(
                    format!("{stem}{suffix}"),
                    PartOfSpeech::Verb,
                    format!("{stem}る"),
                ));
            }
        }
        // Kanji-only ichidan stems (見ます, 着ました).
        for suffix in ["ます", "ました", "ません"] {
            rules.push(Inflection::new(suffix, PartOfSpeech::Verb, "る"));
        }

        dedup_longest_first(rules)
    })
}

/// Adjective-only rules, used after a known adjective stem.
pub fn adjective_inflections() -> &'static [Inflection] {
    static RULES: OnceLock<Vec<Inflection>> = OnceLock::new();
    RULES.get_or_init(|| {
        let rules = ADJECTIVE_ENDINGS
            .iter()
            .map(|(ending, base)| Inflection::new(*ending, PartOfSpeech::Adjective, *base))
            .collect();
        dedup_longest_first(rules)
    })
}

fn dedup_longest_first(rules: Vec<Inflection>) -> Vec<Inflection> {
    let mut seen = HashSet::new();
    let mut rules: Vec<Inflection> = rules
        .into_iter()
        .filter(|rule| seen.insert(rule.ending.clone()))
        .collect();
    // Stable: equal lengths keep insertion priority.
    rules.sort_by_key(|rule| std::cmp::Reverse(rule.ending.chars().count()));
    rules
}

/// Longest rule whose ending starts `tail`.
pub fn match_prefix<'r>(rules: &'r [Inflection], tail: &str) -> Option<&'r Inflection> {
    rules.iter().find(|rule| tail.starts_with(rule.ending.as_str()))
}

/// Hiragana words: (surface, part of speech, base form).
pub const HIRAGANA_WORDS: &[(&str, PartOfSpeech, &str)] = &[
    // particles and auxiliaries
    ("は", PartOfSpeech::Other, "は"),
    ("が", PartOfSpeech::Other, "が"),
    ("を", PartOfSpeech::Other, "を"),
    ("に", PartOfSpeech::Other, "に"),
    ("で", PartOfSpeech::Other, "で"),
    ("と", PartOfSpeech::Other, "と"),
    ("も", PartOfSpeech::Other, "も"),
    ("の", PartOfSpeech::Other, "の"),
    ("へ", PartOfSpeech::Other, "へ"),
    ("や", PartOfSpeech::Other, "や"),
    ("か", PartOfSpeech::Other, "か"),
    ("ね", PartOfSpeech::Other, "ね"),
    ("よ", PartOfSpeech::Other, "よ"),
    ("な", PartOfSpeech::Other, "な"),
    ("わ", PartOfSpeech::Other, "わ"),
    ("ぞ", PartOfSpeech::Other, "ぞ"),
    ("ば", PartOfSpeech::Other, "ば"),
    ("から", PartOfSpeech::Other, "から"),
    ("まで", PartOfSpeech::Other, "まで"),
    ("より", PartOfSpeech::Other, "より"),
    ("けど", PartOfSpeech::Other, "けど"),
    ("けれど", PartOfSpeech::Other, "けれど"),
    ("って", PartOfSpeech::Other, "って"),
    ("ので", PartOfSpeech::Other, "ので"),
    ("のに", PartOfSpeech::Other, "のに"),
    ("ながら", PartOfSpeech::Other, "ながら"),
    ("という", PartOfSpeech::Other, "という"),
    ("です", PartOfSpeech::Other, "です"),
    ("でした", PartOfSpeech::Other, "です"),
    ("でしょう", PartOfSpeech::Other, "です"),
    ("ます", PartOfSpeech::Other, "ます"),
    ("ました", PartOfSpeech::Other, "ます"),
    ("だ", PartOfSpeech::Other, "だ"),
    ("だった", PartOfSpeech::Other, "だ"),
    ("じゃ", PartOfSpeech::Other, "じゃ"),
    ("た", PartOfSpeech::Other, "た"),
    ("て", PartOfSpeech::Other, "て"),
    ("し", PartOfSpeech::Other, "し"),
    ("ない", PartOfSpeech::Other, "ない"),
    ("なかった", PartOfSpeech::Other, "ない"),
    ("たい", PartOfSpeech::Other, "たい"),
    // verbs
    ("する", PartOfSpeech::Verb, "する"),
    ("した", PartOfSpeech::Verb, "する"),
    ("して", PartOfSpeech::Verb, "する"),
    ("します", PartOfSpeech::Verb, "する"),
    ("しました", PartOfSpeech::Verb, "する"),
    ("しない", PartOfSpeech::Verb, "する"),
    ("いる", PartOfSpeech::Verb, "いる"),
    ("いた", PartOfSpeech::Verb, "いる"),
    ("います", PartOfSpeech::Verb, "いる"),
    ("てる", PartOfSpeech::Verb, "てる"),
    ("ある", PartOfSpeech::Verb, "ある"),
    ("あった", PartOfSpeech::Verb, "ある"),
    ("あります", PartOfSpeech::Verb, "ある"),
    ("なる", PartOfSpeech::Verb, "なる"),
    ("なった", PartOfSpeech::Verb, "なる"),
    ("なります", PartOfSpeech::Verb, "なる"),
    ("できる", PartOfSpeech::Verb, "できる"),
    ("できた", PartOfSpeech::Verb, "できる"),
    ("できない", PartOfSpeech::Verb, "できる"),
    ("やる", PartOfSpeech::Verb, "やる"),
    ("くれる", PartOfSpeech::Verb, "くれる"),
    ("くれた", PartOfSpeech::Verb, "くれる"),
    ("くださる", PartOfSpeech::Verb, "くださる"),
    ("ください", PartOfSpeech::Verb, "くださる"),
    ("みる", PartOfSpeech::Verb, "みる"),
    ("みた", PartOfSpeech::Verb, "みる"),
    ("いく", PartOfSpeech::Verb, "いく"),
    ("いった", PartOfSpeech::Verb, "いく"),
    ("くる", PartOfSpeech::Verb, "くる"),
    ("きた", PartOfSpeech::Verb, "くる"),
    ("れる", PartOfSpeech::Verb, "れる"),
    ("られる", PartOfSpeech::Verb, "られる"),
    ("せる", PartOfSpeech::Verb, "せる"),
    ("させる", PartOfSpeech::Verb, "させる"),
    // adverbs
    ("とても", PartOfSpeech::Adverb, "とても"),
    ("もっと", PartOfSpeech::Adverb, "もっと"),
    ("かなり", PartOfSpeech::Adverb, "かなり"),
    ("ちょっと", PartOfSpeech::Adverb, "ちょっと"),
    ("やっぱり", PartOfSpeech::Adverb, "やっぱり"),
    ("やっぱ", PartOfSpeech::Adverb, "やっぱ"),
    ("まだ", PartOfSpeech::Adverb, "まだ"),
    ("もう", PartOfSpeech::Adverb, "もう"),
    ("ずっと", PartOfSpeech::Adverb, "ずっと"),
    ("たくさん", PartOfSpeech::Adverb, "たくさん"),
    ("すぐ", PartOfSpeech::Adverb, "すぐ"),
    ("また", PartOfSpeech::Adverb, "また"),
    ("めっちゃ", PartOfSpeech::Adverb, "めっちゃ"),
    ("ほんとに", PartOfSpeech::Adverb, "ほんとに"),
    ("いつも", PartOfSpeech::Adverb, "いつも"),
    ("たぶん", PartOfSpeech::Adverb, "たぶん"),
    ("きっと", PartOfSpeech::Adverb, "きっと"),
    ("ぜひ", PartOfSpeech::Adverb, "ぜひ"),
    ("なかなか", PartOfSpeech::Adverb, "なかなか"),
    ("そろそろ", PartOfSpeech::Adverb, "そろそろ"),
    ("そう", PartOfSpeech::Adverb, "そう"),
    ("よう", PartOfSpeech::Other, "よう"),
    // pronouns and formal nouns
    ("こと", PartOfSpeech::Noun, "こと"),
    ("もの", PartOfSpeech::Noun, "もの"),
    ("ところ", PartOfSpeech::Noun, "ところ"),
    ("とき", PartOfSpeech::Noun, "とき"),
    ("ため", PartOfSpeech::Noun, "ため"),
    ("これ", PartOfSpeech::Noun, "これ"),
    ("それ", PartOfSpeech::Noun, "それ"),
    ("あれ", PartOfSpeech::Noun, "あれ"),
    ("ここ", PartOfSpeech::Noun, "ここ"),
    ("そこ", PartOfSpeech::Noun, "そこ"),
    ("みんな", PartOfSpeech::Noun, "みんな"),
    ("さん", PartOfSpeech::Noun, "さん"),
    ("ちゃん", PartOfSpeech::Noun, "ちゃん"),
    ("くん", PartOfSpeech::Noun, "くん"),
    ("いい", PartOfSpeech::Adjective, "いい"),
];

/// Hiragana adjective stems; the kana after them goes through [`adjective_inflections`].
pub const HIRAGANA_ADJECTIVE_STEMS: &[&str] = &[
    "すご", "かわい", "おいし", "うま", "やば", "たのし", "うれし", "かなし", "さみし", "すばらし",
    "むずかし", "やさし", "おもしろ", "つら", "えら", "よ", "ひど", "こわ", "あつ", "さむ",
];
