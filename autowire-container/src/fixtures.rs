//! Service classes shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::class::ClassDescriptor;
use crate::container::{Container, ContainerBuilder};
use crate::settings::ContainerSettings;
use crate::signature::{Param, Signature};
use crate::value::Value;

pub struct Config {
    pub debug: bool,
}

pub struct Session {
    pub config: Arc<Config>,
    pub name: String,
    started: AtomicU32,
}

pub struct Invoice {
    pub total: i64,
}

pub struct Greeter {
    pub name: String,
}

pub struct Transport {
    pub label: &'static str,
}

pub struct Mailer {
    pub transport: Arc<Transport>,
}

pub struct Left;
pub struct Right;

/// `framework::Config`, counting constructions in `builds`.
pub fn config(builds: Arc<AtomicUsize>) -> ClassDescriptor {
    ClassDescriptor::builder::<Config>("framework::Config")
        .plain(move || {
            builds.fetch_add(1, Ordering::SeqCst);
            Config { debug: true }
        })
        .build()
}

/// `framework::Session(config: framework::Config, name = "PHPSESSID")`.
pub fn session() -> ClassDescriptor {
    ClassDescriptor::builder::<Session>("framework::Session")
        .param(Param::new("config").class("framework::Config"))
        .param(Param::new("name").default(String::from("PHPSESSID")))
        .constructor(|args| {
            Ok(Session {
                config: args.get("config")?,
                name: args.cloned("name")?,
                started: AtomicU32::new(0),
            })
        })
        .method("start", Signature::new(), |session, _| {
            Ok(Value::new(session.started.fetch_add(1, Ordering::SeqCst) + 1))
        })
        .method(
            "rename",
            Signature::new()
                .param(Param::new("prefix"))
                .param(Param::new("suffix").default(String::new())),
            |session, args| {
                let prefix: String = args.cloned("prefix")?;
                let suffix: String = args.cloned("suffix")?;
                Ok(Value::new(format!("{prefix}{}{suffix}", session.name)))
            },
        )
        .method(
            "debug_of",
            Signature::new().param(Param::new("config").class("framework::Config")),
            |_, args| Ok(Value::new(args.get::<Config>("config")?.debug)),
        )
        .build()
}

/// `app::Invoice(total)`: `total` must be supplied.
pub fn invoice() -> ClassDescriptor {
    ClassDescriptor::builder::<Invoice>("app::Invoice")
        .param(Param::new("total"))
        .constructor(|args| Ok(Invoice { total: args.cloned("total")? }))
        .build()
}

/// `app::Greeter(name = "x")`.
pub fn greeter() -> ClassDescriptor {
    ClassDescriptor::builder::<Greeter>("app::Greeter")
        .param(Param::new("name").default(String::from("x")))
        .constructor(|args| Ok(Greeter { name: args.cloned("name")? }))
        .build()
}

/// `app::Transport`, built without a constructor.
pub fn transport() -> ClassDescriptor {
    ClassDescriptor::plain("app::Transport", || Transport { label: "autowired" })
}

/// `app::Mailer(transport: app::Transport = Transport { label: "default" })`.
pub fn mailer() -> ClassDescriptor {
    ClassDescriptor::builder::<Mailer>("app::Mailer")
        .param(
            Param::new("transport")
                .class("app::Transport")
                .default(Transport { label: "default" }),
        )
        .constructor(|args| Ok(Mailer { transport: args.get("transport")? }))
        .build()
}

/// `cycle::Left(right: cycle::Right)` and `cycle::Right(left: cycle::Left)`.
pub fn cycle() -> [ClassDescriptor; 2] {
    [
        ClassDescriptor::builder::<Left>("cycle::Left")
            .param(Param::new("right").class("cycle::Right"))
            .constructor(|_| Ok(Left))
            .build(),
        ClassDescriptor::builder::<Right>("cycle::Right")
            .param(Param::new("left").class("cycle::Left"))
            .constructor(|_| Ok(Right))
            .build(),
    ]
}

/// A builder with the framework aliases and every fixture except the cycle.
pub fn builder(config_builds: Arc<AtomicUsize>) -> ContainerBuilder {
    Container::builder()
        .settings(ContainerSettings::default())
        .class(config(config_builds))
        .class(session())
        .class(invoice())
        .class(greeter())
        .class(transport())
        .class(mailer())
        .class(ClassDescriptor::abstract_class("framework::Middleware"))
}

/// [`builder`] built, with a fresh construction counter.
pub fn container() -> Container {
    builder(Arc::new(AtomicUsize::new(0)))
        .build()
        .expect("fixture container builds")
}
