use std::ffi::OsStr;
use std::fs::File;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::userknn::prediction::DEFAULT_NEIGHBORHOOD_SIZE;

// Set some default values
const DEFAULT_NUM_ITEMS_TO_RECOMMEND: usize = 10;
const DEFAULT_MAX_EVALUATIONS: usize = 1000;
const DEFAULT_DELIMITER: &str = "::";

pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub experiment: ExperimentConfig,
}

pub struct ServerConfig {
    pub host: String,
    pub port: usize,
    pub num_workers: usize,
}

pub struct LogConfig {
    pub level: String,
}

pub struct DataConfig {
    pub ratings_data_path: String,
    pub items_data_path: String,
    pub delimiter: String,
}

pub struct ModelConfig {
    pub neighborhood_size_k: usize,
    pub num_items_to_recommend: usize,
}

pub struct ExperimentConfig {
    pub max_evaluations: usize,
    pub out_path: String,
    pub save_records: bool,
}

impl AppConfig {
    pub fn new(config_path: String) -> AppConfig {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path)
                .expect("Loading configuration file failed.");
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "ratings_data_path"]),
                OsStr::new("RATINGS_DATA"),
            ),
            (
                ConfPath::from(&["data", "items_data_path"]),
                OsStr::new("ITEMS_DATA"),
            ),
            (
                ConfPath::from(&["server", "num_workers"]),
                OsStr::new("NUM_WORKERS"),
            ),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    fn parse(conf: justconfig::Config) -> AppConfig {
        AppConfig {
            server: ServerConfig::parse(&conf, ConfPath::from(&["server"])),
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            experiment: ExperimentConfig::parse(&conf, ConfPath::from(&["experiment"])),
        }
    }
}

impl ServerConfig {
    fn parse(conf: &Config, path: ConfPath) -> ServerConfig {
        ServerConfig {
            host: conf
                .get(path.push("host"))
                .trim()
                .value()
                .unwrap_or_else(|_| String::from("0.0.0.0")),
            port: conf.get(path.push("port")).trim().value().unwrap_or(8080),
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| sys_info::cpu_num().unwrap_or_default().try_into().unwrap()),
        }
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .trim()
                .value()
                .unwrap_or_default(),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            ratings_data_path: conf
                .get(path.push("ratings_data_path"))
                .trim()
                .value()
                .unwrap(),
            items_data_path: conf
                .get(path.push("items_data_path"))
                .trim()
                .value()
                .unwrap_or_default(),
            delimiter: conf
                .get(path.push("delimiter"))
                .trim()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_DELIMITER)),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            neighborhood_size_k: conf
                .get(path.push("neighborhood_size_k"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NEIGHBORHOOD_SIZE),
            num_items_to_recommend: conf
                .get(path.push("num_items_to_recommend"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_ITEMS_TO_RECOMMEND),
        }
    }
}

impl ExperimentConfig {
    fn parse(conf: &Config, path: ConfPath) -> ExperimentConfig {
        ExperimentConfig {
            max_evaluations: conf
                .get(path.push("max_evaluations"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_MAX_EVALUATIONS),
            out_path: conf
                .get(path.push("out_path"))
                .trim()
                .value()
                .unwrap_or_else(|_| String::from("grid_search_results.csv")),
            save_records: conf
                .get(path.push("save_records"))
                .trim()
                .value()
                .unwrap_or(false),
        }
    }
}
