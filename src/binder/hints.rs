//! Static input hints per field kind

/// Keyboard layout an input should request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardType {
    #[default]
    Default,
    NumberPad,
    DecimalPad,
    EmailAddress,
    PhonePad,
}

/// Automatic capitalization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capitalize {
    None,
    Words,
    Characters,
}

/// Presentation hints for one input. Carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputHints {
    pub keyboard: KeyboardType,
    pub capitalize: Option<Capitalize>,
    /// Platform content category, e.g. `"emailAddress"`
    pub content_type: Option<&'static str>,
    /// Autofill category, e.g. `"email"`
    pub autocomplete: Option<&'static str>,
    pub secure_entry: bool,
    pub auto_correct: Option<bool>,
    pub select_text_on_focus: bool,
}

/// Semantic kind of a text-shaped field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    /// Number-valued, number pad
    Number,
    /// Number-valued, decimal pad
    Decimal,
    /// Text-valued, number pad
    NumberText,
    /// Text-valued, decimal pad
    DecimalText,
    Email,
    Username,
    Password,
    PostalCode,
    StreetAddress,
    Telephone,
    Name,
    City,
}

impl FieldKind {
    /// Whether input is parsed into a number before it is stored
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Decimal)
    }

    pub fn hints(self) -> InputHints {
        let base = InputHints::default();
        match self {
            FieldKind::Text => base,
            FieldKind::Number | FieldKind::NumberText => InputHints {
                keyboard: KeyboardType::NumberPad,
                ..base
            },
            FieldKind::Decimal | FieldKind::DecimalText => InputHints {
                keyboard: KeyboardType::DecimalPad,
                ..base
            },
            FieldKind::PostalCode => InputHints {
                capitalize: Some(Capitalize::Characters),
                content_type: Some("postalCode"),
                autocomplete: Some("postal-code"),
                auto_correct: Some(false),
                ..base
            },
            FieldKind::StreetAddress => InputHints {
                capitalize: Some(Capitalize::Words),
                autocomplete: Some("street-address"),
                auto_correct: Some(false),
                ..base
            },
            FieldKind::City => InputHints {
                capitalize: Some(Capitalize::Words),
                content_type: Some("addressCity"),
                auto_correct: Some(false),
                ..base
            },
            FieldKind::Telephone => InputHints {
                keyboard: KeyboardType::PhonePad,
                content_type: Some("telephoneNumber"),
                autocomplete: Some("tel"),
                auto_correct: Some(false),
                ..base
            },
            FieldKind::Name => InputHints {
                capitalize: Some(Capitalize::Words),
                autocomplete: Some("name"),
                auto_correct: Some(false),
                ..base
            },
            FieldKind::Username => InputHints {
                capitalize: Some(Capitalize::None),
                content_type: Some("username"),
                autocomplete: Some("username"),
                auto_correct: Some(false),
                select_text_on_focus: true,
                ..base
            },
            FieldKind::Password => InputHints {
                content_type: Some("password"),
                autocomplete: Some("password"),
                secure_entry: true,
                auto_correct: Some(false),
                select_text_on_focus: true,
                ..base
            },
            FieldKind::Email => InputHints {
                keyboard: KeyboardType::EmailAddress,
                capitalize: Some(Capitalize::None),
                content_type: Some("emailAddress"),
                autocomplete: Some("email"),
                auto_correct: Some(false),
                ..base
            },
        }
    }
}
