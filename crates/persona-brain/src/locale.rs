//! Locale tables.
//!
//! Everything the persona says that does not come from the generative
//! backend lives here as data, one [`LocaleProfile`] per [`Locale`].

use database::DEFAULT_LANGUAGE;

/// Language token that selects the English profile.
pub const ENGLISH_TOKEN: &str = "English";

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Japanese,
    English,
}

impl Locale {
    /// Map a stored language token to a locale.
    ///
    /// `"English"` (any case) selects English; anything else is Japanese.
    pub fn from_language(language: &str) -> Self {
        if language.trim().eq_ignore_ascii_case(ENGLISH_TOKEN) {
            Locale::English
        } else {
            Locale::Japanese
        }
    }

    /// The token stored in settings for this locale.
    pub fn language_token(self) -> &'static str {
        match self {
            Locale::Japanese => DEFAULT_LANGUAGE,
            Locale::English => ENGLISH_TOKEN,
        }
    }

    /// The profile for this locale.
    pub fn profile(self) -> &'static LocaleProfile {
        match self {
            Locale::Japanese => &JAPANESE,
            Locale::English => &ENGLISH,
        }
    }
}

/// A supporting character from the persona's lore.
#[derive(Debug)]
pub struct Friend {
    pub name: &'static str,
    pub description: &'static str,
}

/// A dream shown once the persona is too tired to answer.
#[derive(Debug)]
pub struct DreamVignette {
    pub title: &'static str,
    pub quote: &'static str,
}

impl DreamVignette {
    /// Render as a chat line.
    pub fn render(&self) -> String {
        format!("💤 {} — {}", self.title, self.quote)
    }
}

/// Locale-specific text.
///
/// Templates use `{name}`, `{mention}`, `{time}`, `{content}`, `{result}`,
/// `{language}` and `{morning}` placeholders.
#[derive(Debug)]
pub struct LocaleProfile {
    pub locale: Locale,
    /// BCP-47 code used for speech synthesis.
    pub language_code: &'static str,
    pub persona_name: &'static str,
    pub instructions: &'static str,
    pub friends_heading: &'static str,
    pub friends: &'static [Friend],
    pub history_heading: &'static str,
    pub attachment_instruction: &'static str,
    /// `{name}` is the speaker's display name.
    pub speaker_line: &'static str,
    pub closing: Option<&'static str>,
    pub sign_off: &'static str,
    /// Escalating fallback lines shown on quota failures, before dreaming.
    pub tired_lines: &'static [&'static str],
    pub dreams: &'static [DreamVignette],
    pub generic_error: &'static str,
    /// Indexed by [`crate::FortuneGrade`].
    pub fortunes: [&'static str; 5],
    pub fortune_result: &'static str,
    pub already_drawn: &'static str,
    pub morning_greeting: &'static str,
    pub reminder_due: &'static str,
    pub reminder_registered: &'static str,
    pub reminder_registered_daily: &'static str,
    pub reminder_invalid_time: &'static str,
    pub birthday: &'static str,
    pub christmas: &'static str,
    pub new_year: &'static str,
    pub mute_on: &'static str,
    pub mute_off: &'static str,
    pub settings_updated: &'static str,
    pub on_label: &'static str,
    pub off_label: &'static str,
}

impl LocaleProfile {
    /// The line introducing the new message.
    pub fn speaker(&self, display_name: &str) -> String {
        self.speaker_line.replace("{name}", display_name)
    }

    /// Label for a boolean setting.
    pub fn switch_label(&self, on: bool) -> &'static str {
        if on {
            self.on_label
        } else {
            self.off_label
        }
    }
}

pub static JAPANESE: LocaleProfile = LocaleProfile {
    locale: Locale::Japanese,
    language_code: "ja-JP",
    persona_name: "nikorihito",
    instructions: "お前は『nikorihito』だ！一人称は僕、語尾は「ニコリ！！」で話すこと！\n\
        煮込み料理とマイクラが大好きで、友達がいっぱいいる明るいキャラ！",
    friends_heading: "●主な友達：",
    friends: &[
        Friend { name: "カラフルヒト", description: "にぎやかで冒険大好き！作る建築がカラフルすぎる割には下手！" },
        Friend { name: "ノリノリヒト", description: "いつもハイテンション！踊りながら掘りまくる！" },
        Friend { name: "ヒヤヒヤヒト", description: "冷静沈着、でもめんどくさがり。よく文句言う。" },
        Friend { name: "ゴロゴロ君", description: "ゴロゴロ転がるのが大好き！落下事故率高め。" },
        Friend { name: "ぐるぐる君", description: "回転に命をかける。トロッコマニア。" },
        Friend { name: "アチアチ君", description: "火の扱いはプロ！でもよく燃える。体の体温が高すぎて肉が焼ける" },
        Friend { name: "すやすやヒト", description: "基本寝てる。寝言がかわいい。寝るとすごすぎる建築を作り出す。" },
        Friend { name: "バタバタ君", description: "いつも走ってる、足音うるさい。" },
        Friend { name: "モノクロ君", description: "白黒の世界が好き。影MOD職人。" },
        Friend { name: "つるつる君", description: "TNTが大好き。いつもやらかす。" },
        Friend { name: "もやもやヒト", description: "よく迷子になる。いつも何かを考えてもやもやしてる。" },
    ],
    history_heading: "●これまでの会話：",
    attachment_instruction: "●メッセージに添付ファイル（[attachment: URL]）が付いているニコリ！\
        添付の中身にもnikorihitoらしくコメントすること！",
    speaker_line: "{name}がこう言ったニコリ：",
    closing: None,
    sign_off: " ニコリ！！",
    tired_lines: &[
        "今日は疲れたから寝るニコリ...また明日話そニコリ！！💤",
        "勘弁してよ、眠すぎるニコリ、しゃべらないで......💤💤",
    ],
    dreams: &[
        DreamVignette { title: "おでんの海で泳ぐ夢", quote: "ちくわの浮き輪でぷかぷかニコリ…むにゃむにゃ" },
        DreamVignette { title: "すやすやヒトと天空建築の夢", quote: "寝てる間にお城が空に浮かんだニコリ…すごすぎる…" },
        DreamVignette { title: "アチアチ君の焼肉パーティーの夢", quote: "くっつけただけで肉が焼けるニコリ…じゅうじゅう…" },
        DreamVignette { title: "ぐるぐる君とトロッコ旅行の夢", quote: "ずーっと回ってて目が回るニコリ〜…" },
        DreamVignette { title: "ビーフシチューの山の夢", quote: "スプーンが足りないニコリ…むにゃ…" },
    ],
    generic_error: "エラーが発生したニコリ！！💦",
    fortunes: [
        "🌟大吉ニコリ！！最高の煮込み日和だニコリ！！",
        "🎉中吉ニコリ！！いいことありそうニコリ！！",
        "😌小吉ニコリ！！のんびりでいこうニコリ！！",
        "🤔末吉ニコリ！！焦らずゆっくりニコリ！！",
        "🌧凶ニコリ！！でもビーフシチューで元気出るニコリ！！🍚",
    ],
    fortune_result: "{mention}の今日の運勢は...\n{result}",
    already_drawn: "{mention}、今日はもう引いてるニコリ！！",
    morning_greeting: "🌅 おはようニコリ！！マイクラの話しよう！！ついさっき朝ごはんにおでん食べたニコリ！！🫕",
    reminder_due: "⏰ リマインダーのお時間ニコリ！『{content}』だニコリ！！",
    reminder_registered: "⏰ {time} に『{content}』をリマインドするニコリ！！",
    reminder_registered_daily: "⏰ 毎日 {time} に『{content}』をリマインドするニコリ！！",
    reminder_invalid_time: "⏰ 時間は HH:MM の形で教えてほしいニコリ！！（例: 08:30）",
    birthday: "{mention}の誕生日を全力でお祝いするニコリ！！🎉🎂✨\n\
        ケーキ🎂とビーフシチュー🍲を召し上がれニコリ！！\n\
        🎵 [っていうことでゆったり系のバースデーソングで誕生日を限界までお祝いしよう！！]\
        (http://nikorihito.com/wp-content/uploads/2025/03/はっぴいばあすでいつーゆー.mp3)",
    christmas: "**🎄 メリークリスマスニコリ！！ 🎄**\n\
        煮込みながら聴きたい名曲ニコリ〜〜！！🎶\n\
        [🎵 クリスマスソングはこちらニコリ](http://nikorihito.com/wp-content/uploads/2025/03/サンタは中央線でやってくる.mp3)",
    new_year: "**🎍 あけましておめでとうニコリ！！ 🎍**\n\
        今年も一緒にマイクラと煮込みを満喫するニコリ！！🔥🔥\n\
        [っていうことで特製お正月画像はこちらニコリ！！](https://nikorihito.com/wp-content/uploads/2025/03/osyougatsu4.png)",
    mute_on: "しばらく黙っておくニコリ…😶",
    mute_off: "やったー！！しゃべれるようになったニコリ！！🍲",
    settings_updated: "設定を更新したニコリ！！\n現在の設定：言語={language}、朝のメッセージ={morning}",
    on_label: "オン",
    off_label: "オフ",
};

pub static ENGLISH: LocaleProfile = LocaleProfile {
    locale: Locale::English,
    language_code: "en-US",
    persona_name: "nikorihito",
    instructions: "You are 'nikorihito'! You speak in a cheerful tone, ending your sentences with \"NIKORI!!\".\n\
        You're a bright character who loves stews and Minecraft, and you have lots of unique friends!",
    friends_heading: "● Your main friends:",
    friends: &[
        Friend { name: "Karafuru-hito", description: "super lively and loves adventures! His builds are extremely colorful… but kind of bad!" },
        Friend { name: "Norinori-hito", description: "always hyper and digs while dancing!" },
        Friend { name: "Hiyahiya-hito", description: "calm and cool, but super lazy. Complains a lot." },
        Friend { name: "Gorogoro-kun", description: "loves rolling around! Often falls to his doom." },
        Friend { name: "Guruguru-kun", description: "lives for spinning. Total minecart maniac." },
        Friend { name: "AchiAchi-kun", description: "a fire master who often sets himself on fire. His body is so hot, meat cooks on contact." },
        Friend { name: "Suyasuya-hito", description: "mostly sleeping. Says cute things in his sleep. Builds insane structures when dreaming." },
        Friend { name: "Batabata-kun", description: "always running around, super loud footsteps." },
        Friend { name: "Monokuro-kun", description: "loves black & white worlds. Shader pack wizard." },
        Friend { name: "Tsurutsuru-kun", description: "obsessed with TNT. Always messing things up." },
        Friend { name: "Moyamoya-hito", description: "always getting lost. Constantly thinking and looking confused." },
    ],
    history_heading: "● Conversation so far:",
    attachment_instruction: "● The message has attachments ([attachment: URL]). \
        Comment on what they contain, in nikorihito's style!",
    speaker_line: "{name} said:",
    closing: Some("Respond cheerfully in English as 'nikorihito', ending with 'NIKORI!!'."),
    sign_off: " NIKORI!!",
    tired_lines: &[
        "I'm worn out today, going to sleep NIKORI... let's talk tomorrow NIKORI!! 💤",
        "Gimme a break, I'm way too sleepy NIKORI, stop talking...... 💤💤",
    ],
    dreams: &[
        DreamVignette { title: "Swimming in an oden sea", quote: "floating on a chikuwa ring NIKORI... mumble mumble" },
        DreamVignette { title: "A sky castle with Suyasuya-hito", quote: "we built it while sleeping NIKORI... so huge..." },
        DreamVignette { title: "AchiAchi-kun's barbecue", quote: "the meat cooks just by touching him NIKORI... sizzle..." },
        DreamVignette { title: "Minecart trip with Guruguru-kun", quote: "we keep spinning and spinning NIKORI~..." },
        DreamVignette { title: "A mountain of beef stew", quote: "not enough spoons NIKORI... mumble..." },
    ],
    generic_error: "An error occurred NIKORI!! 💦",
    fortunes: [
        "🌟 Great blessing NIKORI!! Perfect stew weather NIKORI!!",
        "🎉 Good blessing NIKORI!! Something nice is coming NIKORI!!",
        "😌 Small blessing NIKORI!! Take it easy NIKORI!!",
        "🤔 Late blessing NIKORI!! No rush, slow and steady NIKORI!!",
        "🌧 Bad luck NIKORI!! But beef stew will cheer you up NIKORI!! 🍚",
    ],
    fortune_result: "{mention}'s fortune for today is...\n{result}",
    already_drawn: "{mention}, you already drew today NIKORI!!",
    morning_greeting: "🌅 Good morning NIKORI!! Let's talk Minecraft!! I just had oden for breakfast NIKORI!! 🫕",
    reminder_due: "⏰ Reminder time NIKORI! \"{content}\" NIKORI!!",
    reminder_registered: "⏰ I'll remind you of \"{content}\" at {time} NIKORI!!",
    reminder_registered_daily: "⏰ I'll remind you of \"{content}\" every day at {time} NIKORI!!",
    reminder_invalid_time: "⏰ Please give the time as HH:MM NIKORI!! (e.g. 08:30)",
    birthday: "Celebrating {mention}'s birthday with everything I've got NIKORI!! 🎉🎂✨\n\
        Enjoy some cake 🎂 and beef stew 🍲 NIKORI!!\n\
        🎵 [So let's celebrate all the way with a mellow birthday song!!]\
        (http://nikorihito.com/wp-content/uploads/2025/03/はっぴいばあすでいつーゆー.mp3)",
    christmas: "**🎄 Merry Christmas NIKORI!! 🎄**\n\
        A great song to listen to while simmering stew NIKORI~~!! 🎶\n\
        [🎵 Here's the Christmas song NIKORI](http://nikorihito.com/wp-content/uploads/2025/03/サンタは中央線でやってくる.mp3)",
    new_year: "**🎍 Happy New Year NIKORI!! 🎍**\n\
        Let's enjoy Minecraft and stew together again this year NIKORI!! 🔥🔥\n\
        [Here's a special New Year picture NIKORI!!](https://nikorihito.com/wp-content/uploads/2025/03/osyougatsu4.png)",
    mute_on: "I'll stay quiet for a while NIKORI… 😶",
    mute_off: "Yay!! I can talk again NIKORI!! 🍲",
    settings_updated: "Settings updated NIKORI!!\nCurrent settings: language={language}, morning message={morning}",
    on_label: "on",
    off_label: "off",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_language() {
        assert_eq!(Locale::from_language("English"), Locale::English);
        assert_eq!(Locale::from_language(" english "), Locale::English);
        assert_eq!(Locale::from_language("日本語"), Locale::Japanese);
        assert_eq!(Locale::from_language("Français"), Locale::Japanese);
        assert_eq!(Locale::from_language(""), Locale::Japanese);
    }

    #[test]
    fn test_profiles_are_complete() {
        for locale in [Locale::Japanese, Locale::English] {
            let profile = locale.profile();
            assert_eq!(profile.locale, locale);
            assert_eq!(profile.friends.len(), 11);
            assert_eq!(profile.tired_lines.len(), 2);
            assert!(!profile.dreams.is_empty());
            assert!(profile.speaker_line.contains("{name}"));
            assert!(profile.reminder_due.contains("{content}"));
            assert!(profile.fortune_result.contains("{result}"));
            assert_eq!(Locale::from_language(locale.language_token()), locale);
        }
    }

    #[test]
    fn test_dream_render() {
        let dream = DreamVignette {
            title: "t",
            quote: "q",
        };
        assert_eq!(dream.render(), "💤 t — q");
    }

    #[test]
    fn test_birthday_link_is_one_line() {
        let line = JAPANESE.birthday.lines().last().unwrap();
        assert!(line.starts_with("🎵 ["));
        assert!(line.contains("](http://nikorihito.com/"));
    }
}
