//! Field table, per-field text state and required-field validation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::calculator::{parse_amount, LoanInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    HomePrice,
    DownPayment,
    InterestRate,
    LoanTerm,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    /// Name used in validation messages.
    pub name: &'static str,
    pub required: bool,
    pub step: f64,
}

/// Display order of the form.
pub static FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        id: FieldId::HomePrice,
        label: "Home Price ($)*",
        name: "Home Price",
        required: true,
        step: 1.0,
    },
    FieldSpec {
        id: FieldId::DownPayment,
        label: "Down Payment ($)*",
        name: "Down Payment",
        required: true,
        step: 1.0,
    },
    FieldSpec {
        id: FieldId::InterestRate,
        label: "Interest Rate (%)*",
        name: "Interest Rate",
        required: true,
        step: 0.01,
    },
    FieldSpec {
        id: FieldId::LoanTerm,
        label: "Loan Term (years)*",
        name: "Loan Term",
        required: true,
        step: 1.0,
    },
];

impl FieldId {
    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self.index()]
    }

    pub fn index(self) -> usize {
        match self {
            FieldId::HomePrice => 0,
            FieldId::DownPayment => 1,
            FieldId::InterestRate => 2,
            FieldId::LoanTerm => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{} is required", .field.spec().name)]
    MissingRequiredField { field: FieldId },
}

/// At most one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FieldId, FormError>);

impl ValidationErrors {
    pub fn get(&self, field: FieldId) -> Option<&FormError> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormError> {
        self.0.values()
    }

    pub fn fields(&self) -> Vec<FieldId> {
        self.0.keys().copied().collect()
    }

    fn set(&mut self, field: FieldId, error: Option<FormError>) {
        match error {
            Some(error) => {
                self.0.insert(field, error);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: [String; 4],
    errors: ValidationErrors,
    submitted: bool,
}

impl FormState {
    pub fn value(&self, field: FieldId) -> &str {
        &self.values[field.index()]
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn set_value(&mut self, field: FieldId, value: impl Into<String>) {
        self.values[field.index()] = value.into();
        self.revalidate(field);
    }

    pub fn push_char(&mut self, field: FieldId, c: char) {
        self.values[field.index()].push(c);
        self.revalidate(field);
    }

    pub fn pop_char(&mut self, field: FieldId) {
        self.values[field.index()].pop();
        self.revalidate(field);
    }

    /// Moves the value by `steps` multiples of the field's step. Empty or
    /// unparseable text steps from zero.
    pub fn step(&mut self, field: FieldId, steps: i32) {
        let spec = field.spec();
        let current = parse_amount(self.value(field));
        let base = if current.is_finite() { current } else { 0.0 };
        let next = base + spec.step * f64::from(steps);
        let precision = step_precision(spec.step);
        self.set_value(field, format!("{:.*}", precision, next));
    }

    /// Checks every field; on success returns the parsed inputs.
    pub fn submit(&mut self) -> Result<LoanInputs, ValidationErrors> {
        self.submitted = true;
        for spec in &FIELDS {
            let error = check(spec, self.value(spec.id));
            self.errors.set(spec.id, error);
        }
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }

        let down_payment = self.value(FieldId::DownPayment);
        Ok(LoanInputs {
            home_price: parse_amount(self.value(FieldId::HomePrice)),
            down_payment: if down_payment.trim().is_empty() {
                None
            } else {
                Some(parse_amount(down_payment))
            },
            annual_interest_rate_percent: parse_amount(self.value(FieldId::InterestRate)),
            loan_term_years: parse_amount(self.value(FieldId::LoanTerm)),
        })
    }

    // Errors only track edits once a submit has been attempted.
    fn revalidate(&mut self, field: FieldId) {
        if self.submitted {
            let error = check(field.spec(), self.value(field));
            self.errors.set(field, error);
        }
    }
}

fn check(spec: &FieldSpec, value: &str) -> Option<FormError> {
    (spec.required && value.trim().is_empty())
        .then_some(FormError::MissingRequiredField { field: spec.id })
}

fn step_precision(step: f64) -> usize {
    let mut precision = 0;
    let mut scaled = step;
    while precision < 6 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        precision += 1;
    }
    precision
}
