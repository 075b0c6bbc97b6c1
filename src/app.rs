//! Application state and key handling for the sign-up demo
//!
//! The demo mounts a sign-up form and a nested address form under it. Both
//! share one focus chain, so Enter walks from the last sign-up field into the
//! address fields and skips the read-only country field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tui_form_state::{
    FieldElement, FieldKind, FieldRules, Form, FormOptions, FormValue, SubmitOutcome, TextField,
    Verdict,
};

use crate::config::DemoConfig;
use crate::platform::SUBMIT_MODIFIER;

/// Which form instance owns a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Signup,
    Address,
}

/// Terminal stand-in for an input element
#[derive(Debug, Default)]
pub struct TuiInput {
    focused: Cell<bool>,
    disabled: bool,
}

impl TuiInput {
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }
}

impl FieldElement for TuiInput {
    fn focus(&self) {
        self.focused.set(true);
    }

    fn blur(&self) {
        self.focused.set(false);
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn is_editable(&self) -> bool {
        !self.disabled
    }
}

/// One rendered input and the field it is bound to
#[derive(Debug)]
pub struct FieldSlot {
    pub owner: Owner,
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub element: Rc<TuiInput>,
}

/// Fields in mount order: (owner, key, label, kind, disabled)
const FIELDS: [(Owner, &str, &str, FieldKind, bool); 8] = [
    (Owner::Signup, "email", "E-mail", FieldKind::Email, false),
    (Owner::Signup, "telephone", "Telephone", FieldKind::Telephone, false),
    (Owner::Signup, "password", "Password", FieldKind::Password, false),
    (Owner::Signup, "nested.objectProperty", "Nested property", FieldKind::Text, false),
    (Owner::Address, "street", "Street", FieldKind::StreetAddress, false),
    (Owner::Address, "country", "Country", FieldKind::Text, true),
    (Owner::Address, "postal", "Postal code", FieldKind::PostalCode, false),
    (Owner::Address, "city", "City", FieldKind::City, false),
];

fn looks_like_mail(s: &str) -> bool {
    let (Some(at), Some(dot)) = (s.rfind('@'), s.rfind('.')) else {
        return false;
    };
    at < dot && at > 0 && !s.contains("@@") && dot > 2 && s.len() - dot > 2
}

fn looks_like_telephone(s: &str) -> bool {
    s.len() == 10 && s.chars().all(|c| c.is_ascii_digit())
}

fn rules_for(key: &str) -> FieldRules {
    match key {
        "email" => FieldRules::new().validate(|v: &FormValue, _: &FormValue| {
            if looks_like_mail(&v.to_text()) {
                Verdict::Pass
            } else {
                Verdict::from("Email-address is invalid")
            }
        }),
        "telephone" => FieldRules::new().validate(|v: &FormValue, _: &FormValue| {
            if looks_like_telephone(&v.to_text()) {
                Verdict::Pass
            } else {
                Verdict::from("Telephone is invalid")
            }
        }),
        "password" => FieldRules::new().required().min_length(3).max_length(10),
        "street" | "city" => FieldRules::new().required(),
        "postal" => FieldRules::new().max_length(7),
        _ => FieldRules::new(),
    }
}

fn default_signup() -> FormValue {
    [
        ("email", FormValue::from("")),
        ("telephone", FormValue::from("")),
        ("password", FormValue::from("")),
        ("nested", [("objectProperty", "")].into_iter().collect()),
    ]
    .into_iter()
    .collect()
}

fn default_address() -> FormValue {
    [("street", ""), ("country", "NL"), ("postal", ""), ("city", "")]
        .into_iter()
        .collect()
}

pub struct App {
    pub signup: Form,
    pub address: Form,
    pub fields: Vec<FieldSlot>,
    pub focused: Option<usize>,
    pub status_message: Option<String>,
    address_outbox: Rc<RefCell<Option<FormValue>>>,
    submission: Rc<RefCell<Option<FormValue>>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &DemoConfig) -> Self {
        let submission: Rc<RefCell<Option<FormValue>>> = Rc::default();
        let sink = Rc::clone(&submission);
        let signup = Form::new(
            config.initial_values.clone().unwrap_or_else(default_signup),
            FormOptions::new().on_submit(move |values| {
                tracing::info!("sign-up submitted");
                *sink.borrow_mut() = Some(values.clone());
            }),
        );

        // The address form reports through the deferred change notification;
        // the sign-up form picks the tree up on the next tick.
        let address_outbox: Rc<RefCell<Option<FormValue>>> = Rc::default();
        let outbox = Rc::clone(&address_outbox);
        let address = Form::nested(
            signup.context(),
            config.address_values.clone().unwrap_or_else(default_address),
            FormOptions::new().on_change(move |values| {
                *outbox.borrow_mut() = Some(values.clone());
            }),
        );

        let fields = FIELDS
            .iter()
            .map(|&(owner, key, label, kind, disabled)| FieldSlot {
                owner,
                key,
                label,
                kind,
                element: Rc::new(if disabled {
                    TuiInput::disabled()
                } else {
                    TuiInput::default()
                }),
            })
            .collect();

        let mut app = Self {
            signup,
            address,
            fields,
            focused: None,
            status_message: None,
            address_outbox,
            submission,
            should_quit: false,
        };
        app.mount();
        app
    }

    /// Attach every input, run the layout check and focus the first field
    fn mount(&mut self) {
        for index in 0..self.fields.len() {
            let slot = &self.fields[index];
            let element = Rc::clone(&slot.element);
            self.binding(index).attach(self.form(slot.owner), Some(element));
        }
        for index in 0..self.fields.len() {
            let binding = self.binding(index);
            binding.layout(self.form_mut(self.fields[index].owner));
        }
        self.focus_first();
    }

    pub fn form(&self, owner: Owner) -> &Form {
        match owner {
            Owner::Signup => &self.signup,
            Owner::Address => &self.address,
        }
    }

    fn form_mut(&mut self, owner: Owner) -> &mut Form {
        match owner {
            Owner::Signup => &mut self.signup,
            Owner::Address => &mut self.address,
        }
    }

    /// Fresh binding for the field at `index`
    pub fn binding(&self, index: usize) -> TextField {
        let slot = &self.fields[index];
        self.form(slot.owner)
            .bind(slot.kind, slot.key, rules_for(slot.key))
    }

    pub fn has_error(&self, index: usize) -> bool {
        let slot = &self.fields[index];
        self.form(slot.owner).has_error(slot.key)
    }

    pub fn error(&self, index: usize) -> Option<&str> {
        let slot = &self.fields[index];
        self.form(slot.owner).error(slot.key)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Values handed to the submit callback, if a submit went through
    pub fn submission(&self) -> Option<FormValue> {
        self.submission.borrow().clone()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }
        // Ctrl+S works everywhere, Cmd+S as well on macOS
        let submit_modifiers = SUBMIT_MODIFIER | KeyModifiers::CONTROL;
        if key.code == KeyCode::Char('s') && key.modifiers.intersects(submit_modifiers) {
            self.submit();
            return;
        }

        let Some(index) = self.focused else {
            if matches!(key.code, KeyCode::Tab | KeyCode::Down) {
                self.focus_first();
            }
            return;
        };

        match key.code {
            KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                self.edit(index, |text| text.push(c))
            }
            KeyCode::Backspace => self.edit(index, |text| {
                text.pop();
            }),
            KeyCode::Enter => self.submit_editing(index),
            KeyCode::Tab | KeyCode::Down => self.move_focus(index, true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(index, false),
            _ => {}
        }
    }

    /// Let deferred change notifications run, then forward the address tree
    pub async fn tick(&mut self) {
        tokio::task::yield_now().await;
        self.run_pending();
    }

    fn run_pending(&mut self) {
        if self.signup.run_pending() == 0 {
            return;
        }
        let pending = self.address_outbox.borrow_mut().take();
        if let Some(address) = pending {
            self.signup.set_field("address", address);
        }
    }

    fn edit(&mut self, index: usize, apply: impl FnOnce(&mut String)) {
        let binding = self.binding(index);
        let mut text = binding.value.clone();
        apply(&mut text);
        binding.change_text(self.form_mut(self.fields[index].owner), &text);
    }

    fn submit_editing(&mut self, index: usize) {
        let owner = self.fields[index].owner;
        let binding = self.binding(index);
        match binding.submit_editing(self.form(owner)) {
            Some(outcome) => {
                tracing::debug!("return key on `{}`: {outcome:?}", binding.key);
                binding.blur(self.form_mut(owner));
                self.focused = self.fields.iter().position(|f| f.element.is_focused());
            }
            None => {
                // Last field: blur and fall through to the form's submit
                self.blur_field(index);
                self.focused = None;
                self.submit();
            }
        }
    }

    fn blur_field(&mut self, index: usize) {
        self.fields[index].element.blur();
        let binding = self.binding(index);
        binding.blur(self.form_mut(self.fields[index].owner));
    }

    fn focus_first(&mut self) {
        self.focused = self.fields.iter().position(|f| !f.element.is_disabled());
        if let Some(index) = self.focused {
            self.fields[index].element.focus();
        }
    }

    fn move_focus(&mut self, index: usize, forward: bool) {
        let count = self.fields.len();
        let next = (1..count)
            .map(|step| {
                if forward {
                    (index + step) % count
                } else {
                    (index + count - step) % count
                }
            })
            .find(|&i| !self.fields[i].element.is_disabled());

        if let Some(next) = next {
            self.blur_field(index);
            self.fields[next].element.focus();
            self.focused = Some(next);
        }
    }

    /// Submit the address form first and surface its state on the sign-up form
    fn submit(&mut self) {
        self.run_pending();

        let nested = match self.address.submit() {
            SubmitOutcome::Submitted => None,
            SubmitOutcome::Blocked { outstanding } => {
                Some(format!("address has {outstanding} invalid field(s)"))
            }
        };
        self.signup.set_error("address", nested);

        let message = match self.signup.submit() {
            SubmitOutcome::Submitted => "No errors, submitted!".to_string(),
            SubmitOutcome::Blocked { outstanding } => {
                match self.signup.errors().messages().next() {
                    Some((key, first)) => {
                        format!("{outstanding} problem(s) left, {key}: {first}")
                    }
                    None => format!("{outstanding} problem(s) left before submitting"),
                }
            }
        };
        self.status_message = Some(message);
    }
}
