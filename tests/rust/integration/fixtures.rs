use graphfrag::{CompilerConfig, Entity, EntitySchema, FragmentCompiler, MatchClause};
use lazy_static::lazy_static;

pub struct JsonUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub login_count: u32,
}

pub struct CustomUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

pub struct Knows;

pub struct Follows {
    pub since: String,
}

lazy_static! {
    static ref JSON_USER: EntitySchema<JsonUser> = EntitySchema::builder("JsonUser")
        .field("id", |u: &JsonUser| &u.id, &[("json", "id")])
        .field("name", |u: &JsonUser| &u.name, &[("json", "name")])
        .field("email", |u: &JsonUser| &u.email, &[("json", "email")])
        .hidden_field("password_hash", &[("json", "password")])
        .field("login_count", |u: &JsonUser| &u.login_count, &[])
        .build();
    static ref CUSTOM_USER: EntitySchema<CustomUser> = EntitySchema::builder("CustomUser")
        .field("id", |u: &CustomUser| &u.id, &[("custom", "id")])
        .field("name", |u: &CustomUser| &u.name, &[("custom", "name")])
        .field("email", |u: &CustomUser| &u.email, &[("custom", "email")])
        .build();
    static ref KNOWS: EntitySchema<Knows> = EntitySchema::builder("Knows").build();
    static ref FOLLOWS: EntitySchema<Follows> = EntitySchema::builder("Follows")
        .field("since", |f: &Follows| &f.since, &[("json", "since"), ("custom", "since")])
        .build();
}

impl Entity for JsonUser {
    fn schema() -> &'static EntitySchema<Self> {
        &JSON_USER
    }
}

impl Entity for CustomUser {
    fn schema() -> &'static EntitySchema<Self> {
        &CUSTOM_USER
    }
}

impl Entity for Knows {
    fn schema() -> &'static EntitySchema<Self> {
        &KNOWS
    }
}

impl Entity for Follows {
    fn schema() -> &'static EntitySchema<Self> {
        &FOLLOWS
    }
}

pub fn json_user(id: &str) -> JsonUser {
    JsonUser {
        id: id.to_string(),
        name: "somenameJSON".to_string(),
        email: "emailTestJSON".to_string(),
        password_hash: "not-exported".to_string(),
        login_count: 3,
    }
}

pub fn custom_user(id: &str) -> CustomUser {
    CustomUser {
        id: id.to_string(),
        name: "somenameCUSTOM".to_string(),
        email: "emailTestCUSTOM".to_string(),
    }
}

pub fn follows() -> Follows {
    Follows {
        since: "yesterday".to_string(),
    }
}

/// The three compiler set-ups every suite runs against
pub enum Setup {
    Defaults,
    CustomTag,
    CustomTagAndVariable,
}

pub const SETUPS: [Setup; 3] = [Setup::Defaults, Setup::CustomTag, Setup::CustomTagAndVariable];

impl Setup {
    pub fn compiler(&self) -> FragmentCompiler {
        let config = match self {
            Setup::Defaults => CompilerConfig::default(),
            Setup::CustomTag => CompilerConfig::builder().tag_name("custom").build().unwrap(),
            Setup::CustomTagAndVariable => CompilerConfig::builder()
                .tag_name("custom")
                .variable("xxxyyyzzz")
                .build()
                .unwrap(),
        };
        FragmentCompiler::new(config).unwrap()
    }

    /// A user record bound under this set-up's tag family
    pub fn user(&self, id: &str) -> Box<dyn graphfrag::Record> {
        match self {
            Setup::Defaults => Box::new(json_user(id)),
            Setup::CustomTag | Setup::CustomTagAndVariable => Box::new(custom_user(id)),
        }
    }
}

pub fn default_match() -> MatchClause {
    MatchClause::native_id("id")
}
