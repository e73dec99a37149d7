// Experience terminal script data.
// Builds the per-language command/output sequence the typing engine replays:
// a git-log style career history with commit, HEAD, and tag markers.

use crate::i18n::{Language, tr};

/// One command and its full output, typed as a unit.
#[derive(Debug, Clone)]
pub struct CommandBlock {
    pub command: String,
    pub output: String,
}

/// Immutable script for one run of the terminal. A language switch builds a
/// wholly new script; blocks are never mixed across languages.
#[derive(Debug, Clone)]
pub struct TerminalScript {
    pub blocks: Vec<CommandBlock>,
}

impl TerminalScript {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Word-wrap a paragraph into 70-column lines, each starting with `prefix`.
pub fn wrap_text(text: &str, prefix: &str) -> String {
    let max_length = 70usize.saturating_sub(prefix.chars().count());
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() <= max_length {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(format!("{}{}", prefix, current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(format!("{}{}", prefix, current));
    }

    lines.join("\n")
}

/// Build the career-history script for the given language.
pub fn experience_script(lang: Language) -> TerminalScript {
    let desc1 = wrap_text(tr(lang, "experience.description1"), "|     ");
    let desc2 = wrap_text(tr(lang, "experience.description2"), "|     ");
    let desc3 = wrap_text(tr(lang, "experience.description3"), "      ");

    let output = format!(
        "* commit 2077c89411067468a44ad143d4e0de30263d0a3a (HEAD -> main, origin/main) (tag: 2.1.0)\n\
         | Author:   Alberto Orsini <orsini.alberto@hotmail.it>\n\
         | Role:     {role1}\n\
         | Company:  {company1}\n\
         | Tags:     Java 17 · Spring Boot 2.5 · Jmx · MySQL · Elasticsearch · Kafka · ActiveMQ ·\n\
         |           Redis · Docker · Kubernetes · Azure · Maven · Git · Linux/Windows\n\
         | Date:     Mon Nov 07 09:00:00 2022 +0100\n\
         |\n\
         {desc1}\n\
         |\n\
         * commit 7b257fc96ce8f12c0e996a6945b71879a0db4ee4 (2.0.0)\n\
         | Author:   Alberto Orsini <orsini.alberto@hotmail.it>\n\
         | Role:     {role2}\n\
         | Company:  {company2}\n\
         | Tags:     Java 8 · Springboot 1.5 · Akka · Apache Camel · MySQL · HBase · Vertica ·\n\
         |           Docker · Maven · Git · Linux\n\
         | Date:     Mon Jul 03 09:00:00 2017 +0100\n\
         |\n\
         {desc2}\n\
         |\n\
         * commit 6683c591d5e2485085cfd68bfafd5a082443b979 (1.0.0)\n  \
         Author:   Alberto Orsini <orsini.alberto@hotmail.it>\n  \
         Role:     {role3}\n  \
         Company:  {company3}\n  \
         Tags:     Java 8 · Spring · Hibernate · SQL Server · JSP · JavaScript · jQuery · HTML ·\n            \
         CSS · Git · Windows\n  \
         Date:     Mon Oct 10 09:00:00 2016 +0100\n\
         \n\
         {desc3}",
        role1 = tr(lang, "experience.role1"),
        company1 = tr(lang, "experience.company1"),
        role2 = tr(lang, "experience.role2"),
        company2 = tr(lang, "experience.company2"),
        role3 = tr(lang, "experience.role3"),
        company3 = tr(lang, "experience.company3"),
        desc1 = desc1,
        desc2 = desc2,
        desc3 = desc3,
    );

    TerminalScript {
        blocks: vec![CommandBlock {
            command: tr(lang, "experience.command").to_string(),
            output,
        }],
    }
}
