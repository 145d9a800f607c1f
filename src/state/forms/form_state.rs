//! Form state management and form structs

use super::field::FormField;

/// Which flow a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Login,
    Signup,
}

impl FlowKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

/// Trait for common form operations
pub trait Form {
    fn kind(&self) -> FlowKind;
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
    fn get_field_mut(&mut self, index: usize) -> Option<&mut FormField>;

    /// Step (1-based) on which the field at `index` is shown
    fn step_of(&self, _index: usize) -> usize {
        1
    }

    /// Number of steps this form is split into
    fn step_count(&self) -> usize {
        1
    }

    fn fields(&self) -> Vec<&FormField> {
        (0..self.field_count())
            .filter_map(|i| self.get_field(i))
            .collect()
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        (0..self.field_count()).find(|&i| self.get_field(i).is_some_and(|f| f.name == name))
    }

    fn field_by_name(&self, name: &str) -> Option<&FormField> {
        self.field_index(name).and_then(|i| self.get_field(i))
    }

    fn field_by_name_mut(&mut self, name: &str) -> Option<&mut FormField> {
        let index = self.field_index(name)?;
        self.get_field_mut(index)
    }

    /// Fields shown on steps strictly before `step`
    fn fields_before_step(&self, step: usize) -> Vec<&FormField> {
        (0..self.field_count())
            .filter(|&i| self.step_of(i) < step)
            .filter_map(|i| self.get_field(i))
            .collect()
    }
}

/// Enum representing the form currently receiving input
#[derive(Debug, Clone)]
pub enum FormState {
    Login(LoginForm),
    Signup(SignupForm),
}

impl FormState {
    /// Fresh, empty form for `kind`
    pub fn new(kind: FlowKind) -> Self {
        match kind {
            FlowKind::Login => FormState::Login(LoginForm::new()),
            FlowKind::Signup => FormState::Signup(SignupForm::new()),
        }
    }

    pub fn as_form(&self) -> &dyn Form {
        match self {
            FormState::Login(f) => f,
            FormState::Signup(f) => f,
        }
    }

    pub fn as_form_mut(&mut self) -> &mut dyn Form {
        match self {
            FormState::Login(f) => f,
            FormState::Signup(f) => f,
        }
    }

    pub fn kind(&self) -> FlowKind {
        self.as_form().kind()
    }

    pub fn next_field(&mut self) {
        self.as_form_mut().next_field();
    }

    pub fn prev_field(&mut self) {
        self.as_form_mut().prev_field();
    }

    pub fn get_active_field_mut(&mut self) -> &mut FormField {
        self.as_form_mut().get_active_field_mut()
    }
}

// Login Form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: FormField::email("email", "Email"),
            password: FormField::password("password", "Password"),
            active_field_index: 0,
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn kind(&self) -> FlowKind {
        FlowKind::Login
    }
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.email),
            1 => Some(&self.password),
            _ => None,
        }
    }
    fn get_field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            _ => None,
        }
    }
}

// Signup Form
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub first_name: FormField,
    pub last_name: FormField,
    pub username: FormField,
    pub email: FormField,
    pub password: FormField,
    pub confirm_password: FormField,
    pub terms: FormField,
    pub active_field_index: usize,
}

impl SignupForm {
    /// Identity on step 1, credentials on step 2, terms on step 3
    pub const STEPS: usize = 3;

    pub fn new() -> Self {
        Self {
            first_name: FormField::text("first_name", "First name"),
            last_name: FormField::text("last_name", "Last name"),
            username: FormField::text("username", "Username"),
            email: FormField::email("email", "Email"),
            password: FormField::password("password", "Password"),
            confirm_password: FormField::password("confirm_password", "Confirm password"),
            terms: FormField::checkbox("terms", "I accept the terms of service"),
            active_field_index: 0,
        }
    }
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for SignupForm {
    fn kind(&self) -> FlowKind {
        FlowKind::Signup
    }
    fn field_count(&self) -> usize {
        7
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(6);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.first_name,
            1 => &mut self.last_name,
            2 => &mut self.username,
            3 => &mut self.email,
            4 => &mut self.password,
            5 => &mut self.confirm_password,
            _ => &mut self.terms,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.first_name),
            1 => Some(&self.last_name),
            2 => Some(&self.username),
            3 => Some(&self.email),
            4 => Some(&self.password),
            5 => Some(&self.confirm_password),
            6 => Some(&self.terms),
            _ => None,
        }
    }
    fn get_field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        match index {
            0 => Some(&mut self.first_name),
            1 => Some(&mut self.last_name),
            2 => Some(&mut self.username),
            3 => Some(&mut self.email),
            4 => Some(&mut self.password),
            5 => Some(&mut self.confirm_password),
            6 => Some(&mut self.terms),
            _ => None,
        }
    }
    fn step_of(&self, index: usize) -> usize {
        match index {
            0..=2 => 1,
            3..=5 => 2,
            _ => 3,
        }
    }
    fn step_count(&self) -> usize {
        Self::STEPS
    }
}
