// Display language handling and translation lookup.
// Provides a typed dotted-path lookup with fallback to the key itself.

use chrono::{DateTime, Local, Utc};

/// Active display language for user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    It,
    En,
}

impl Language {
    /// Two-letter code used for persistence.
    pub fn code(&self) -> &'static str {
        match self {
            Language::It => "it",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "it" => Some(Language::It),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Language::It => Language::En,
            Language::En => Language::It,
        }
    }
}

/// Look up a translation by dotted path. Returns `None` for unknown paths.
pub fn lookup(lang: Language, path: &str) -> Option<&'static str> {
    match lang {
        Language::It => lookup_it(path),
        Language::En => lookup_en(path),
    }
}

/// Look up a translation, falling back to the key itself when the path is
/// missing. Keeps a missing string visible instead of blanking the UI.
pub fn tr(lang: Language, path: &str) -> &str {
    lookup(lang, path).unwrap_or(path)
}

fn lookup_en(path: &str) -> Option<&'static str> {
    let s = match path {
        "projects.error.title" => "Unable to load projects",
        "projects.error.rateLimit" => "GitHub API rate limit reached",
        "projects.error.rateLimitMessage" => {
            "Too many requests were made to the GitHub API from this network."
        }
        "projects.error.usingCache" => "Showing cached projects",
        "projects.error.cacheWarning" => {
            "The GitHub API rate limit was reached, so this list may be out of date."
        }
        "projects.error.errorCache" => "Connection problem, showing cached projects",
        "projects.error.visitProfile" => "Visit my GitHub profile to see the projects:",
        "projects.empty" => "No public projects to show",
        "experience.command" => "git log --graph --all career",
        "experience.role1" => "Senior Software Engineer",
        "experience.company1" => "Contactlab S.p.A.",
        "experience.description1" => {
            "Design and evolution of the marketing automation platform: event \
             pipelines on Kafka, search on Elasticsearch, container deployments \
             on Kubernetes and Azure."
        }
        "experience.role2" => "Software Engineer",
        "experience.company2" => "Contactlab S.p.A.",
        "experience.description2" => {
            "Backend development on the delivery engine: high volume mail \
             pipelines with Akka and Apache Camel, storage on MySQL, HBase \
             and Vertica."
        }
        "experience.role3" => "Junior Software Engineer",
        "experience.company3" => "Gruppo Sintesi S.r.l.",
        "experience.description3" => {
            "Full stack development of management web applications with \
             Spring, Hibernate and SQL Server."
        }
        _ => return None,
    };
    Some(s)
}

fn lookup_it(path: &str) -> Option<&'static str> {
    let s = match path {
        "projects.error.title" => "Impossibile caricare i progetti",
        "projects.error.rateLimit" => "Limite di richieste API GitHub raggiunto",
        "projects.error.rateLimitMessage" => {
            "Sono state fatte troppe richieste alle API GitHub da questa rete."
        }
        "projects.error.usingCache" => "Progetti mostrati dalla cache",
        "projects.error.cacheWarning" => {
            "Il limite delle API GitHub è stato raggiunto, la lista potrebbe non essere aggiornata."
        }
        "projects.error.errorCache" => "Problema di connessione, progetti mostrati dalla cache",
        "projects.error.visitProfile" => "Visita il mio profilo GitHub per vedere i progetti:",
        "projects.empty" => "Nessun progetto pubblico da mostrare",
        "experience.command" => "git log --graph --all career",
        "experience.role1" => "Senior Software Engineer",
        "experience.company1" => "Contactlab S.p.A.",
        "experience.description1" => {
            "Progettazione ed evoluzione della piattaforma di marketing \
             automation: pipeline di eventi su Kafka, ricerca su Elasticsearch, \
             deploy containerizzati su Kubernetes e Azure."
        }
        "experience.role2" => "Software Engineer",
        "experience.company2" => "Contactlab S.p.A.",
        "experience.description2" => {
            "Sviluppo backend sul motore di delivery: pipeline mail ad alto \
             volume con Akka e Apache Camel, storage su MySQL, HBase e Vertica."
        }
        "experience.role3" => "Junior Software Engineer",
        "experience.company3" => "Gruppo Sintesi S.r.l.",
        "experience.description3" => {
            "Sviluppo full stack di applicazioni web gestionali con Spring, \
             Hibernate e SQL Server."
        }
        _ => return None,
    };
    Some(s)
}

/// Human-readable rate limit reset message, localized and rendered in the
/// viewer's local timezone (hours and minutes only).
pub fn rate_limit_reset_label(reset: DateTime<Utc>, lang: Language) -> String {
    let local = reset.with_timezone(&Local);
    let hhmm = local.format("%H:%M");
    match lang {
        Language::En => format!("The limit resets at {}.", hhmm),
        Language::It => format!("Il limite si resetta alle {}.", hhmm),
    }
}
