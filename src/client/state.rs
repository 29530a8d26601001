//! Client view state as a reducer.
//!
//! Every user action and every finished request is an [`Event`]. Feeding it
//! to [`Model::update`] mutates the model and returns the [`Effect`]s the
//! runtime has to carry out (HTTP calls, banner timers). The model itself
//! never performs I/O.

use std::time::Duration;

use uuid::Uuid;

use crate::contacts::{
    dto::{ContactPage, CreateContactRequest},
    Contact,
};
use crate::validation::{validate_contact, Field, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        validate_contact(&self.name, &self.phone, &self.email)
    }

    pub fn to_request(&self) -> CreateContactRequest {
        CreateContactRequest {
            name: Some(self.name.clone()),
            phone: Some(self.phone.clone()),
            email: Some(self.email.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Started,
    NextPage,
    PrevPage,
    Refresh,
    FetchSucceeded(ContactPage),
    FetchFailed,
    FieldEdited(Field, String),
    Submit,
    SubmitSucceeded,
    SubmitFailed,
    DeleteRequested(Uuid),
    DeleteConfirmed,
    DeleteCancelled,
    DeleteSucceeded,
    DeleteFailed,
    BannerExpired(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage(i64),
    CreateContact(ContactForm),
    DeleteContact(Uuid),
    ExpireBanner { generation: u64, after: Duration },
}

#[derive(Debug, Clone)]
pub struct Model {
    pub contacts: Vec<Contact>,
    pub current_page: i64,
    pub total_pages: i64,
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub banner: Option<Banner>,
    pub pending_delete: Option<Uuid>,
    banner_ttl: Duration,
    banner_generation: u64,
}

impl Model {
    pub fn new(banner_ttl: Duration) -> Self {
        Self {
            contacts: Vec::new(),
            current_page: 1,
            total_pages: 1,
            form: ContactForm::default(),
            errors: FieldErrors::default(),
            banner: None,
            pending_delete: None,
            banner_ttl,
            banner_generation: 0,
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Started | Event::Refresh => vec![Effect::FetchPage(self.current_page)],
            Event::NextPage if self.can_go_next() => self.go_to_page(self.current_page + 1),
            Event::PrevPage if self.can_go_prev() => self.go_to_page(self.current_page - 1),
            Event::NextPage | Event::PrevPage => Vec::new(),
            Event::FetchSucceeded(page) => {
                self.contacts = page.contacts;
                self.total_pages = page.total_pages;
                self.current_page = page.current_page;
                Vec::new()
            }
            Event::FetchFailed => self.show(BannerKind::Error, "Failed to load contacts"),
            Event::FieldEdited(field, value) => {
                self.form.set(field, value);
                self.errors.clear(field);
                Vec::new()
            }
            Event::Submit => {
                self.errors = self.form.validate();
                if self.errors.is_empty() {
                    vec![Effect::CreateContact(self.form.clone())]
                } else {
                    Vec::new()
                }
            }
            Event::SubmitSucceeded => {
                self.form = ContactForm::default();
                let mut effects = self.show(BannerKind::Success, "Contact added successfully");
                effects.push(Effect::FetchPage(self.current_page));
                effects
            }
            Event::SubmitFailed => self.show(BannerKind::Error, "Failed to save contact"),
            Event::DeleteRequested(id) => {
                self.pending_delete = Some(id);
                Vec::new()
            }
            Event::DeleteConfirmed => match self.pending_delete.take() {
                Some(id) => vec![Effect::DeleteContact(id)],
                None => Vec::new(),
            },
            Event::DeleteCancelled => {
                self.pending_delete = None;
                Vec::new()
            }
            Event::DeleteSucceeded => {
                let mut effects = if self.contacts.len() == 1 && self.current_page > 1 {
                    self.go_to_page(self.current_page - 1)
                } else {
                    vec![Effect::FetchPage(self.current_page)]
                };
                effects.extend(self.show(BannerKind::Success, "Contact deleted successfully"));
                effects
            }
            Event::DeleteFailed => self.show(BannerKind::Error, "Failed to delete contact"),
            Event::BannerExpired(generation) => {
                if self.banner.as_ref().is_some_and(|b| b.generation == generation) {
                    self.banner = None;
                }
                Vec::new()
            }
        }
    }

    fn go_to_page(&mut self, page: i64) -> Vec<Effect> {
        if page == self.current_page {
            return Vec::new();
        }
        self.current_page = page;
        vec![Effect::FetchPage(page)]
    }

    fn show(&mut self, kind: BannerKind, message: &str) -> Vec<Effect> {
        self.banner_generation += 1;
        self.banner = Some(Banner {
            message: message.into(),
            kind,
            generation: self.banner_generation,
        });
        vec![Effect::ExpireBanner {
            generation: self.banner_generation,
            after: self.banner_ttl,
        }]
    }
}
