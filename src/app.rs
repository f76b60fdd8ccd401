use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::calculator::{calculate, LoanResult};
use crate::form::{FieldId, FormState, ValidationErrors, FIELDS};

pub struct App {
    pub form: FormState,
    pub focused: FieldId,
    pub result: Option<LoanResult>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            focused: FieldId::HomePrice,
            result: None,
        }
    }
}

impl App {
    /// Validates the form and, when every required field is present,
    /// replaces the displayed result.
    pub fn submit(&mut self) -> Result<LoanResult, ValidationErrors> {
        match self.form.submit() {
            Ok(inputs) => {
                let result = calculate(&inputs);
                info!(
                    loan_amount = inputs.loan_amount(),
                    months = inputs.months(),
                    monthly_payment = result.monthly_payment,
                    total_payable = result.total_payable,
                    total_interest = result.total_interest,
                    "computed mortgage payment"
                );
                self.result = Some(result);
                Ok(result)
            }
            Err(errors) => {
                warn!(missing = ?errors.fields(), "submission blocked");
                Err(errors)
            }
        }
    }

    fn focus_next(&mut self) {
        let next = (self.focused.index() + 1) % FIELDS.len();
        self.focused = FIELDS[next].id;
        debug!(field = ?self.focused, "focus");
    }

    fn focus_previous(&mut self) {
        let previous = (self.focused.index() + FIELDS.len() - 1) % FIELDS.len();
        self.focused = FIELDS[previous].id;
        debug!(field = ?self.focused, "focus");
    }
}

/// Returns `true` when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return true,
        KeyCode::Char('s') if ctrl => {
            let _ = app.submit();
        }
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
            app.form.push_char(app.focused, c);
        }
        KeyCode::Backspace => app.form.pop_char(app.focused),
        KeyCode::Enter => {
            let _ = app.submit();
        }
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::PageUp => app.form.step(app.focused, 1),
        KeyCode::PageDown => app.form.step(app.focused, -1),
        _ => {}
    }
    false
}
