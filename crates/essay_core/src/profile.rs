use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inputs collected across the wizard steps.
///
/// Serialized with the wire key names expected by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub target_course: String,
    pub super_curriculars: String,
    pub work_experience: String,
    pub motivation: String,
    pub cv_text: String,
    pub cv_filename: String,
}

/// Every key of [`Profile`] that may be written through [`Profile::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    TargetCourse,
    SuperCurriculars,
    WorkExperience,
    Motivation,
    CvText,
    CvFilename,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::TargetCourse,
        ProfileField::SuperCurriculars,
        ProfileField::WorkExperience,
        ProfileField::Motivation,
        ProfileField::CvText,
        ProfileField::CvFilename,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProfileField::TargetCourse => "target_course",
            ProfileField::SuperCurriculars => "super_curriculars",
            ProfileField::WorkExperience => "work_experience",
            ProfileField::Motivation => "motivation",
            ProfileField::CvText => "cv_text",
            ProfileField::CvFilename => "cv_filename",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for ProfileField {
    type Err = UnknownFieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        ProfileField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownFieldError(wanted.to_string()))
    }
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace exactly one field; every other field is left untouched.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::TargetCourse => &self.target_course,
            ProfileField::SuperCurriculars => &self.super_curriculars,
            ProfileField::WorkExperience => &self.work_experience,
            ProfileField::Motivation => &self.motivation,
            ProfileField::CvText => &self.cv_text,
            ProfileField::CvFilename => &self.cv_filename,
        }
    }

    /// Gate for leaving step 1.
    pub fn has_target_course(&self) -> bool {
        !self.target_course.trim().is_empty()
    }

    pub fn motivation_chars(&self) -> usize {
        self.motivation.chars().count()
    }

    pub fn has_cv(&self) -> bool {
        !self.cv_filename.is_empty()
    }

    fn slot_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::TargetCourse => &mut self.target_course,
            ProfileField::SuperCurriculars => &mut self.super_curriculars,
            ProfileField::WorkExperience => &mut self.work_experience,
            ProfileField::Motivation => &mut self.motivation,
            ProfileField::CvText => &mut self.cv_text,
            ProfileField::CvFilename => &mut self.cv_filename,
        }
    }
}
