//! `tabtree` - a small git-flavoured command tree built on the dispatcher.
//!
//! Every command below is both executable and tab-completable:
//!
//! ```bash
//! eval "$(tabtree completions bash)"
//! tabtree ch<TAB>          # checkout
//! tabtree checkout feat<TAB>
//! ```

mod tree;

use std::any::Any;
use std::panic;

use tabtree::DispatchOptions;

const OPTIONS: DispatchOptions = DispatchOptions::new(tree::PROGRAM);

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            // The shell stopped reading candidates; nothing left to do.
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

fn main() -> anyhow::Result<()> {
    install_broken_pipe_handler();

    // stdout belongs to the completion protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    tabtree::launch(&OPTIONS, tree::ROOT)?;
    Ok(())
}
