//! Slash-command definitions.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Boolean,
}

/// One option of a slash command.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

/// A slash command to register.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
}

impl CommandSpec {
    fn simple(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            options: Vec::new(),
        }
    }

    fn option(
        mut self,
        name: &'static str,
        description: &'static str,
        kind: OptionKind,
        required: bool,
    ) -> Self {
        self.options.push(OptionSpec {
            name,
            description,
            kind,
            required,
        });
        self
    }

    /// Discord builder for this command.
    pub fn to_builder(&self) -> CreateCommand {
        self.options.iter().fold(
            CreateCommand::new(self.name).description(self.description),
            |command, option| {
                let kind = match option.kind {
                    OptionKind::String => CommandOptionType::String,
                    OptionKind::Boolean => CommandOptionType::Boolean,
                };
                command.add_option(
                    CreateCommandOption::new(kind, option.name, option.description)
                        .required(option.required),
                )
            },
        )
    }
}

/// Every command the bot registers.
pub fn command_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec::simple("nikorihito_birthday", "nikorihitoが誕生日を祝ってくれます"),
        CommandSpec::simple("nikorihito_omikuji", "1日1回おみくじを引けます"),
        CommandSpec::simple("mute", "nikorihitoをミュートにできます"),
        CommandSpec::simple("mute_off", "nikorihitoのミュートを解除できます"),
        CommandSpec::simple("nikorihito_reminder", "リマインダーを登録できます")
            .option("time", "時間 (HH:MM)", OptionKind::String, true)
            .option("content", "リマインドする内容", OptionKind::String, true)
            .option("repeat", "毎日くり返す", OptionKind::Boolean, false),
        CommandSpec::simple("settings", "nikorihitoの設定を変更できます")
            .option("language", "日本語 / English", OptionKind::String, false)
            .option("morning_message", "朝のあいさつを受け取る", OptionKind::Boolean, false),
        CommandSpec::simple("nikorihito_chrismas", "クリスマス気分を楽しもう！🎄"),
        CommandSpec::simple("nikorihito_newyear", "新年をお祝いするニコリ！！🎍"),
    ]
}

/// Builders for every command.
pub fn command_builders() -> Vec<CreateCommand> {
    command_specs().iter().map(CommandSpec::to_builder).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique_and_valid() {
        let specs = command_specs();
        let names: HashSet<_> = specs.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), specs.len());

        for spec in &specs {
            assert!(spec.name.len() <= 32);
            assert!(spec
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
            assert!(!spec.description.is_empty());
        }
    }

    #[test]
    fn test_reminder_options() {
        let specs = command_specs();
        let reminder = specs
            .iter()
            .find(|s| s.name == "nikorihito_reminder")
            .unwrap();

        let required: Vec<_> = reminder
            .options
            .iter()
            .filter(|o| o.required)
            .map(|o| o.name)
            .collect();
        assert_eq!(required, vec!["time", "content"]);
        assert_eq!(reminder.options[2].kind, OptionKind::Boolean);
    }
}
