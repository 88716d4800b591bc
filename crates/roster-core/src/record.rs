//! Record trait and typed field access for the stored entities

use crate::{Result, RosterError};
use roster_types::{
    Post, PostDraft, PostPatch, Profile, ProfileDraft, ProfilePatch, User, UserDraft, UserPatch,
};
use std::fmt;
use uuid::Uuid;

/// Borrowed view of a single record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Uuid(Uuid),
    Text(&'a str),
    Int(i64),
    UuidList(&'a [Uuid]),
}

/// A record that can live in a collection
pub trait Record: Clone + Send + Sync + 'static {
    /// Field selector used by filters
    type Field: Copy + fmt::Debug + Send + Sync;
    /// Every field except `id`
    type Draft: Send + 'static;
    /// Mutable fields, each optional
    type Patch: Send + 'static;

    /// Collection name, used in errors and logs
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn field(&self, field: Self::Field) -> FieldRef<'_>;

    fn from_draft(id: Uuid, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    /// Checked on create and after every change
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn require_text(collection: &str, name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::Validation(format!(
            "{collection}.{name} must not be empty"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    FirstName,
    LastName,
    Email,
    SubscribedToUserIds,
}

impl Record for User {
    type Field = UserField;
    type Draft = UserDraft;
    type Patch = UserPatch;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, field: UserField) -> FieldRef<'_> {
        match field {
            UserField::Id => FieldRef::Uuid(self.id),
            UserField::FirstName => FieldRef::Text(&self.first_name),
            UserField::LastName => FieldRef::Text(&self.last_name),
            UserField::Email => FieldRef::Text(&self.email),
            UserField::SubscribedToUserIds => FieldRef::UuidList(&self.subscribed_to_user_ids),
        }
    }

    fn from_draft(id: Uuid, draft: UserDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            subscribed_to_user_ids: Vec::new(),
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(ids) = patch.subscribed_to_user_ids {
            self.subscribed_to_user_ids = ids;
        }
    }

    fn validate(&self) -> Result<()> {
        require_text(Self::COLLECTION, "firstName", &self.first_name)?;
        require_text(Self::COLLECTION, "lastName", &self.last_name)?;
        require_text(Self::COLLECTION, "email", &self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Id,
    UserId,
    MemberTypeId,
    Birthday,
    Country,
    City,
}

impl Record for Profile {
    type Field = ProfileField;
    type Draft = ProfileDraft;
    type Patch = ProfilePatch;

    const COLLECTION: &'static str = "profiles";

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, field: ProfileField) -> FieldRef<'_> {
        match field {
            ProfileField::Id => FieldRef::Uuid(self.id),
            ProfileField::UserId => FieldRef::Uuid(self.user_id),
            ProfileField::MemberTypeId => FieldRef::Text(&self.member_type_id),
            ProfileField::Birthday => FieldRef::Int(self.birthday),
            ProfileField::Country => FieldRef::Text(&self.country),
            ProfileField::City => FieldRef::Text(&self.city),
        }
    }

    fn from_draft(id: Uuid, draft: ProfileDraft) -> Self {
        Self {
            id,
            avatar: draft.avatar,
            sex: draft.sex,
            birthday: draft.birthday,
            country: draft.country,
            street: draft.street,
            city: draft.city,
            member_type_id: draft.member_type_id,
            user_id: draft.user_id,
        }
    }

    fn apply(&mut self, patch: ProfilePatch) {
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(sex) = patch.sex {
            self.sex = sex;
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = birthday;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(street) = patch.street {
            self.street = street;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(member_type_id) = patch.member_type_id {
            self.member_type_id = member_type_id;
        }
    }

    fn validate(&self) -> Result<()> {
        require_text(Self::COLLECTION, "memberTypeId", &self.member_type_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Id,
    UserId,
    Title,
}

impl Record for Post {
    type Field = PostField;
    type Draft = PostDraft;
    type Patch = PostPatch;

    const COLLECTION: &'static str = "posts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, field: PostField) -> FieldRef<'_> {
        match field {
            PostField::Id => FieldRef::Uuid(self.id),
            PostField::UserId => FieldRef::Uuid(self.user_id),
            PostField::Title => FieldRef::Text(&self.title),
        }
    }

    fn from_draft(id: Uuid, draft: PostDraft) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            user_id: draft.user_id,
        }
    }

    fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    fn validate(&self) -> Result<()> {
        require_text(Self::COLLECTION, "title", &self.title)
    }
}
