//! Basic example of the autowire container.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use autowire::logging;
use autowire::prelude::*;
use tracing::Level;

// === Define your services ===

struct Config {
    app_name: String,
    debug: bool,
}

struct Session {
    config: Arc<Config>,
    name: String,
    hits: AtomicU32,
}

impl Session {
    fn touch(&self) -> u32 {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }
}

struct Request {
    session: Arc<Session>,
    path: String,
}

// === Group them in a provider ===

struct HttpProvider;

impl Provider for HttpProvider {
    fn register(&self, registry: &mut dyn ProviderRegistry) {
        registry.register_class(ClassDescriptor::plain("framework::Config", || Config {
            app_name: "demo".to_string(),
            debug: true,
        }));

        registry.register_class(
            ClassDescriptor::builder::<Session>("framework::Session")
                .param(Param::new("config").class("framework::Config"))
                .param(Param::new("name").default(String::from("PHPSESSID")))
                .constructor(|args| {
                    Ok(Session {
                        config: args.get("config")?,
                        name: args.cloned("name")?,
                        hits: AtomicU32::new(0),
                    })
                })
                .method("touch", Signature::new(), |session, _| Ok(Value::new(session.touch())))
                .method(
                    "greet",
                    Signature::new().param(Param::new("who").default(String::from("guest"))),
                    |session, args| {
                        let who: String = args.cloned("who")?;
                        Ok(Value::new(format!("hello {who} from {}", session.config.app_name)))
                    },
                )
                .build(),
        );

        registry.register_class(
            ClassDescriptor::builder::<Request>("framework::Request")
                .param(Param::new("session").class("session"))
                .param(Param::new("path"))
                .constructor(|args| {
                    Ok(Request {
                        session: args.get("session")?,
                        path: args.cloned("path")?,
                    })
                })
                .build(),
        );
    }
}

// === A static proxy for the session ===

struct SessionFacade;

impl Facade for SessionFacade {
    fn target() -> &'static str {
        "session"
    }
}

fn main() -> Result<()> {
    logging::builder().with_level(Level::DEBUG).container_only().init();

    // Build the container
    let container = Arc::new(Container::builder().add_provider(&HttpProvider).build()?);

    // Aliases resolve to the same singleton as the class identifier
    let config = container.resolve_as::<Config>("config")?;
    let again = container.resolve_as::<Config>("framework::Config")?;
    assert!(Arc::ptr_eq(&config, &again));
    println!("app = {}, debug = {}", config.app_name, config.debug);

    // Autowiring: the session's config comes from the cache
    let session = container.resolve_as::<Session>("session")?;
    assert!(Arc::ptr_eq(&session.config, &config));
    println!("session cookie = {}", session.name);

    // `path` has no default, so it must be supplied
    match container.resolve("request") {
        Err(err) => println!("expected failure: {err}"),
        Ok(_) => unreachable!("request needs a path"),
    }
    let request = container.resolve_fresh("framework::Request");
    assert!(request.is_err());

    let request = container.make(
        "request",
        Args::new().with("path", String::from("/users/1")),
        Scope::Transient,
    )?;
    let request = request.downcast::<Request>().expect("request type");
    println!("request {} shares session: {}", request.path, Arc::ptr_eq(&request.session, &session));

    // Factory: short name plus namespace, never cached
    let fresh = container.factory("session", "framework::", Args::new().with("name", String::from("SID")))?;
    println!("factory session cookie = {}", fresh.downcast::<Session>().expect("session type").name);

    // Facade calls go through the global container
    Container::set_global(Arc::clone(&container));
    SessionFacade::call("touch", vec![])?;
    let hits = SessionFacade::call("touch", vec![])?;
    println!("session touched {} times", hits.downcast_ref::<u32>().copied().unwrap_or_default());

    let greeting = SessionFacade::call("greet", vec![Value::new(String::from("ada"))])?;
    println!("{}", greeting.downcast::<String>().expect("greeting"));

    println!("cached: {:?}", container);
    Ok(())
}
