pub use {anyhow,
         arcstr,
         bio,
         hashbrown,
         itertools,
         log,
         noodles,
         pretty_env_logger,
         serde,
         serde_json};
