//! Testing utilities for uw workspace
//!
//! Value types with hand-written shapes and update methods, shared by the
//! integration tests.

#![allow(missing_docs)]

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::sync::Arc;
use uw_core::{UpdateResult, UpdateSignature, UpdateWithHelper};
use uw_shape::{ConstructError, ConstructorDescriptor, OptionalValue, Shaped, TypeDescriptor};

static HELPER: Lazy<UpdateWithHelper> = Lazy::new(UpdateWithHelper::new);

/// Helper shared by the fixtures' update methods
pub fn shared_helper() -> &'static UpdateWithHelper {
    &HELPER
}

fn signature(result: Result<UpdateSignature, uw_core::ResolveError>) -> UpdateSignature {
    result.expect("fixture signatures are never empty")
}

/// Single `name`, mapped straight onto the only constructor
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
}

static NAMED_TYPE: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<NamedType>()
            .intent::<String>("name")
            .build(),
    )
});

impl NamedType {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { name: name.into() })
    }

    pub fn signature() -> &'static UpdateSignature {
        &NAMED_TYPE
    }

    pub fn update_with(self: &Arc<Self>, name: OptionalValue<String>) -> UpdateResult<Arc<Self>> {
        shared_helper().update_with(self, &NAMED_TYPE, (name,))
    }
}

impl Shaped for NamedType {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |s: &NamedType| s.name.clone())
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .build(|args| Ok(NamedType { name: args.take()? })),
            )
            .build()
    }
}

/// `name` is updatable, `id` comes from the source
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAndNumberedType {
    pub name: String,
    pub id: i32,
}

static NAMED_AND_NUMBERED_TYPE: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<NamedAndNumberedType>()
            .intent::<String>("name")
            .build(),
    )
});

impl NamedAndNumberedType {
    pub fn new(name: impl Into<String>, id: i32) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            id,
        })
    }

    pub fn signature() -> &'static UpdateSignature {
        &NAMED_AND_NUMBERED_TYPE
    }

    pub fn update_with(self: &Arc<Self>, name: OptionalValue<String>) -> UpdateResult<Arc<Self>> {
        shared_helper().update_with(self, &NAMED_AND_NUMBERED_TYPE, (name,))
    }
}

impl Shaped for NamedAndNumberedType {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |s: &NamedAndNumberedType| s.name.clone())
            .property("Id", |s: &NamedAndNumberedType| s.id)
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .param::<i32>("id")
                    .build(|args| {
                        Ok(NamedAndNumberedType {
                            name: args.take()?,
                            id: args.take()?,
                        })
                    }),
            )
            .build()
    }
}

/// `id` is not exposed as a property; the constructor defaults it to `-1`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAndPrivateNumberedType {
    pub name: String,
    id: i32,
}

static NAMED_AND_PRIVATE_NUMBERED_TYPE: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<NamedAndPrivateNumberedType>()
            .intent::<String>("name")
            .build(),
    )
});

impl NamedAndPrivateNumberedType {
    pub fn new(name: impl Into<String>, id: i32) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            id,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn signature() -> &'static UpdateSignature {
        &NAMED_AND_PRIVATE_NUMBERED_TYPE
    }

    pub fn update_with(self: &Arc<Self>, name: OptionalValue<String>) -> UpdateResult<Arc<Self>> {
        shared_helper().update_with(self, &NAMED_AND_PRIVATE_NUMBERED_TYPE, (name,))
    }
}

impl Shaped for NamedAndPrivateNumberedType {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |s: &NamedAndPrivateNumberedType| s.name.clone())
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .param_with_default("id", -1_i32)
                    .build(|args| {
                        Ok(NamedAndPrivateNumberedType {
                            name: args.take()?,
                            id: args.take()?,
                        })
                    }),
            )
            .build()
    }
}

/// Update method asks for `title`, which the type does not have
#[derive(Debug, Clone, PartialEq)]
pub struct FaultyNamedType {
    pub name: String,
}

static FAULTY_NAMED_TYPE: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<FaultyNamedType>()
            .intent::<String>("title")
            .build(),
    )
});

impl FaultyNamedType {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { name: name.into() })
    }

    pub fn signature() -> &'static UpdateSignature {
        &FAULTY_NAMED_TYPE
    }

    pub fn update_with(self: &Arc<Self>, title: OptionalValue<String>) -> UpdateResult<Arc<Self>> {
        shared_helper().update_with(self, &FAULTY_NAMED_TYPE, (title,))
    }
}

impl Shaped for FaultyNamedType {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |s: &FaultyNamedType| s.name.clone())
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .build(|args| Ok(FaultyNamedType { name: args.take()? })),
            )
            .build()
    }
}

/// Update method declares one intent but forwards two values
#[derive(Debug, Clone, PartialEq)]
pub struct FaultyNamedAndNumberedType {
    pub name: String,
    pub id: i32,
}

static FAULTY_NAMED_AND_NUMBERED_TYPE: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<FaultyNamedAndNumberedType>()
            .intent::<String>("name")
            .build(),
    )
});

impl FaultyNamedAndNumberedType {
    pub fn new(name: impl Into<String>, id: i32) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            id,
        })
    }

    pub fn signature() -> &'static UpdateSignature {
        &FAULTY_NAMED_AND_NUMBERED_TYPE
    }

    pub fn update_with(self: &Arc<Self>, name: OptionalValue<String>) -> UpdateResult<Arc<Self>> {
        shared_helper().update(
            self,
            &FAULTY_NAMED_AND_NUMBERED_TYPE,
            &[name.erase(), OptionalValue::Set(12_i32).erase()],
        )
    }
}

impl Shaped for FaultyNamedAndNumberedType {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |s: &FaultyNamedAndNumberedType| s.name.clone())
            .property("Id", |s: &FaultyNamedAndNumberedType| s.id)
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .param::<i32>("id")
                    .build(|args| {
                        Ok(FaultyNamedAndNumberedType {
                            name: args.take()?,
                            id: args.take()?,
                        })
                    }),
            )
            .build()
    }
}

/// `id` is neither a property nor defaulted, so no constructor qualifies
#[derive(Debug, Clone, PartialEq)]
pub struct FaultyNamedAndPrivateNumberedType {
    pub name: String,
    id: i32,
}

static FAULTY_NAMED_AND_PRIVATE_NUMBERED_TYPE: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<FaultyNamedAndPrivateNumberedType>()
            .intent::<String>("name")
            .build(),
    )
});

impl FaultyNamedAndPrivateNumberedType {
    pub fn new(name: impl Into<String>, id: i32) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            id,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn signature() -> &'static UpdateSignature {
        &FAULTY_NAMED_AND_PRIVATE_NUMBERED_TYPE
    }

    pub fn update_with(self: &Arc<Self>, name: OptionalValue<String>) -> UpdateResult<Arc<Self>> {
        shared_helper().update_with(self, &FAULTY_NAMED_AND_PRIVATE_NUMBERED_TYPE, (name,))
    }
}

impl Shaped for FaultyNamedAndPrivateNumberedType {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Name", |s: &FaultyNamedAndPrivateNumberedType| s.name.clone())
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("name")
                    .param::<i32>("id")
                    .build(|args| {
                        Ok(FaultyNamedAndPrivateNumberedType {
                            name: args.take()?,
                            id: args.take()?,
                        })
                    }),
            )
            .build()
    }
}

/// A role held between two dates
///
/// The title is never blank and carries no surrounding whitespace. If an end
/// date is present it is after the start date.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDetails {
    title: String,
    start_date: NaiveDate,
    end_date_if_any: Option<NaiveDate>,
}

impl RoleDetails {
    /// Validate and build
    ///
    /// # Errors
    /// Returns `Rejected` for a blank title or an end date not after the start
    pub fn new(
        title: &str,
        start_date: NaiveDate,
        end_date_if_any: Option<NaiveDate>,
    ) -> Result<Self, ConstructError> {
        if title.trim().is_empty() {
            return Err(ConstructError::rejected("title must not be blank"));
        }
        if end_date_if_any.is_some_and(|end| end <= start_date) {
            return Err(ConstructError::rejected("end date must be after start date"));
        }
        Ok(Self {
            title: title.trim().to_string(),
            start_date,
            end_date_if_any,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date_if_any(&self) -> Option<NaiveDate> {
        self.end_date_if_any
    }
}

impl Shaped for RoleDetails {
    fn describe() -> TypeDescriptor<Self> {
        TypeDescriptor::builder()
            .property("Title", |r: &RoleDetails| r.title.clone())
            .property("StartDate", |r: &RoleDetails| r.start_date)
            .property("EndDateIfAny", |r: &RoleDetails| r.end_date_if_any)
            .constructor(
                ConstructorDescriptor::builder("new")
                    .param::<String>("title")
                    .param::<NaiveDate>("startDate")
                    .param::<Option<NaiveDate>>("endDateIfAny")
                    .build(|args| {
                        let title: String = args.take()?;
                        RoleDetails::new(&title, args.take()?, args.take()?)
                    }),
            )
            .build()
    }
}

/// Declaring type of the extension-style update method on [`RoleDetails`]
#[derive(Debug, Clone, Copy)]
pub struct RoleDetailsExtensions;

static ROLE_DETAILS_EXTENSIONS: Lazy<UpdateSignature> = Lazy::new(|| {
    signature(
        UpdateSignature::builder::<RoleDetailsExtensions>()
            .intent::<String>("title")
            .intent::<NaiveDate>("startDate")
            .intent::<Option<NaiveDate>>("endDateIfAny")
            .build(),
    )
});

impl RoleDetailsExtensions {
    pub fn signature() -> &'static UpdateSignature {
        &ROLE_DETAILS_EXTENSIONS
    }
}

/// Update method added to `Arc<RoleDetails>` from outside the type
pub trait RoleDetailsExt {
    fn update_with(
        &self,
        title: OptionalValue<String>,
        start_date: OptionalValue<NaiveDate>,
        end_date_if_any: OptionalValue<Option<NaiveDate>>,
    ) -> UpdateResult<Arc<RoleDetails>>;
}

impl RoleDetailsExt for Arc<RoleDetails> {
    fn update_with(
        &self,
        title: OptionalValue<String>,
        start_date: OptionalValue<NaiveDate>,
        end_date_if_any: OptionalValue<Option<NaiveDate>>,
    ) -> UpdateResult<Arc<RoleDetails>> {
        shared_helper().update_with(
            self,
            &ROLE_DETAILS_EXTENSIONS,
            (title, start_date, end_date_if_any),
        )
    }
}

/// Calendar date shorthand for tests
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn create_role(title: &str, start: NaiveDate, end: Option<NaiveDate>) -> Arc<RoleDetails> {
    Arc::new(RoleDetails::new(title, start, end).expect("valid role"))
}
