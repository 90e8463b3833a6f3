//! Template content for project scaffolding.
//!
//! Placeholders of the form `{name}` are substituted by [`render`](super::render).

/// `go.mod` for a new project.
pub const GO_MOD: &str = r#"module {name}

go 1.21

require (
	github.com/spf13/cobra v1.8.0
	github.com/spf13/viper v1.18.2
)
"#;

/// Root entry point. `buildDate` is overwritten by the linker at build time.
pub const MAIN_GO: &str = r#"package main

import (
	"fmt"
	"log"
	"os"
	"os/signal"
	"syscall"
	"time"

	"github.com/spf13/cobra"
	"github.com/spf13/viper"
)

var (
	configFile string
	version    = "{version}"
	buildDate  = "unknown"
)

func main() {
	rootCmd := &cobra.Command{
		Use:     "{name}",
		Short:   "{description}",
		Version: version,
		Run: func(cmd *cobra.Command, args []string) {
			run()
		},
	}

	rootCmd.PersistentFlags().StringVarP(&configFile, "config", "c", "./config.json", "config file path")

	if err := rootCmd.Execute(); err != nil {
		log.Fatal(err)
	}
}

func run() {
	if configFile != "" {
		viper.SetConfigFile(configFile)
		if err := viper.ReadInConfig(); err != nil {
			log.Printf("warning: could not read config file: %v", err)
		}
	}

	fmt.Printf("starting {name} v%s (built %s)\n", version, buildDate)

	stop := make(chan os.Signal, 1)
	signal.Notify(stop, os.Interrupt, syscall.SIGTERM)

	go func() {
		for {
			fmt.Println("service running...")
			time.Sleep(10 * time.Second)
		}
	}()

	<-stop
	fmt.Println("shutting down")
}
"#;

/// Entry point created by `dscli add` under `cmd/<name>/`.
pub const CMD_MAIN_GO: &str = r#"package main

import (
	"fmt"
	"log"
)

var buildDate = "unknown"

func main() {
	fmt.Printf("starting {name} (built %s)\n", buildDate)
	log.Println("{name} is running")
}
"#;

pub const README_MD: &str = r#"# {name}

{description}

## Installation

```bash
go mod tidy
```

## Usage

```bash
go run .
```

## Build

Use dscli to build and package the module:

```bash
dscli build            # host platform
dscli build -t all     # every supported platform
```

Archives are written to `dist/`.

## Author

{author}

## Version

{version}
"#;

pub const GITIGNORE: &str = r#"# Binaries
*.exe
*.exe~
*.dll
*.so
*.dylib
*.test
*.out

# Go workspace file
go.work

# Build output
bin/
dist/
*.zip
*.tar.gz

# Logs
logs/*.log

# IDE
.vscode/
.idea/
*.swp
*.swo
*~

# OS
.DS_Store
Thumbs.db
"#;

/// Default `.dscli.json`.
pub const DSCLI_JSON: &str = r#"{
  "assets": [
    "config/",
    "templates/"
  ],
  "excludes": [
    "*.log",
    "*.tmp",
    ".git/"
  ],
  "output_dir": "dist"
}
"#;
