//! Bootstrapping a container from configuration files
//!
//! ```bash
//! cargo run --example bootstrap
//! ```

use container_config::{
    AutowiredInstance, Bindings, ClassMetadata, ClassRegistry, Compiler, Configuration, Container,
    DefaultParameterParser, Definition, ExtensionFn, FactoryContainer, FactoryMap, FnFactory,
    MergedConfiguration, ParameterMetadata, Reflection, Value,
};
use std::path::Path;
use std::sync::Arc;

struct Logger {
    handlers: Vec<String>,
}

struct Mailer {
    logger: Arc<Logger>,
    sender: String,
}

fn classes() -> Arc<dyn Reflection> {
    Arc::new(
        ClassRegistry::new()
            .with(ClassMetadata::interface("Listener"))
            .with(ClassMetadata::new("StderrHandler", |_| Ok(Value::from("stderr"))))
            .with(ClassMetadata::new("AuditListener", |_| Ok(Value::from("audit"))).implements("Listener"))
            .with(
                ClassMetadata::new("Mailer", |args| {
                    let logger = args
                        .first()
                        .and_then(|logger| logger.downcast::<Logger>())
                        .ok_or_else(|| container_config::ContainerError::not_instantiable("Mailer", "no logger"))?;
                    let sender = args.get(1).and_then(Value::as_str).unwrap_or_default().to_owned();
                    Ok(Value::service(Mailer { logger, sender }))
                })
                .parameter(ParameterMetadata::new("logger").class("Logger"))
                .parameter(ParameterMetadata::new("sender").builtin("String").default("noreply@localhost")),
            ),
    )
}

fn main() {
    #[cfg(feature = "logging")]
    container_config::logging::init();

    let classes = classes();
    let bindings = Arc::new(
        Bindings::new()
            .with_classes(Arc::clone(&classes))
            .with_factory(FnFactory::new("make_logger", |_| {
                Ok(Value::service(Logger { handlers: vec![] }))
            }))
            .with_extension(ExtensionFn::new("add_handlers", |container, _logger| {
                let handlers = container.get("handlers")?;
                let handlers = handlers
                    .as_list()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|h| h.as_str().map(str::to_owned))
                    .collect();
                Ok(Value::service(Logger { handlers }))
            })),
    );

    let config = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/config");
    let configuration = MergedConfiguration::from_paths(
        bindings,
        [config.join("services.json"), config.join("local.toml")],
    );

    let entry = match configuration.entry() {
        Ok(entry) => entry,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    let mut factories = entry.factories();
    let mailer = AutowiredInstance::new("Mailer", Arc::new(DefaultParameterParser), classes);
    match mailer.factory() {
        Ok(factory) => {
            factories.insert("Mailer", factory);
        }
        Err(error) => eprintln!("{error}"),
    }

    println!("=== Compiled resolver (parameters only) ===\n");
    let parameters: FactoryMap = factories
        .iter()
        .filter(|(id, _)| *id == "app.name" || *id == "db.url")
        .map(|(id, factory)| (id.to_owned(), Arc::clone(factory)))
        .collect();
    match Compiler::new().compile(&parameters) {
        Ok(source) => println!("{source}"),
        Err(error) => eprintln!("{error}"),
    }

    let container = FactoryContainer::new(factories);

    println!("=== Entries ===\n");
    for id in ["db.url", "handlers", "listeners"] {
        println!("{id}: {:?}", container.get(id));
    }

    if let Ok(mailer) = container.get("Mailer") {
        if let Some(mailer) = mailer.downcast::<Mailer>() {
            println!(
                "Mailer: sender {} with handlers {:?}",
                mailer.sender, mailer.logger.handlers
            );
        }
    }
}
