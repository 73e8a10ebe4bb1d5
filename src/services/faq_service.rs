use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::FaqDao,
    db::entities::faq,
    error::AppError,
    services::{
        crud_service::CrudService,
        validation::{non_negative, optional_non_negative, required_text},
    },
};

#[derive(Debug, Deserialize)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub position: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub position: Option<i32>,
}

#[derive(Clone)]
pub struct FaqService {
    faqs: FaqDao,
}

impl FaqService {
    pub fn new(faqs: FaqDao) -> Self {
        Self { faqs }
    }
}

#[async_trait::async_trait]
impl CrudService for FaqService {
    type Dao = FaqDao;
    type Create = NewFaq;
    type Update = FaqPatch;

    fn dao(&self) -> &Self::Dao {
        &self.faqs
    }

    fn label(&self) -> &'static str {
        "Faq"
    }

    fn build_create(&self, payload: NewFaq, _actor_id: i32) -> Result<faq::ActiveModel, AppError> {
        Ok(faq::ActiveModel {
            question: Set(required_text("question", &payload.question)?),
            answer: Set(required_text("answer", &payload.answer)?),
            position: Set(optional_non_negative("position", payload.position)?),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &FaqPatch) -> Result<(), AppError> {
        if let Some(question) = &payload.question {
            required_text("question", question)?;
        }
        if let Some(answer) = &payload.answer {
            required_text("answer", answer)?;
        }
        optional_non_negative("position", payload.position)?;
        Ok(())
    }

    fn apply_update(&self, active: &mut faq::ActiveModel, payload: FaqPatch) -> Result<(), AppError> {
        if let Some(question) = payload.question {
            active.question = Set(required_text("question", &question)?);
        }
        if let Some(answer) = payload.answer {
            active.answer = Set(required_text("answer", &answer)?);
        }
        if let Some(position) = payload.position {
            active.position = Set(Some(non_negative("position", position)?));
        }
        Ok(())
    }
}
