#[cfg(test)]
pub mod test {
    /// A single environment with required and optional variables of every type.
    pub const BASIC_DOCS: &str = r#"
    name: doconf_unittest

    {DEFAULT}

    [section1]
    DEBUG (bool): debug mode on or off
    AGE (int): person's age
    SUCCESS (float): how successful in parsing this config from 0 to 1
    NAME (str): the person's name
    IDEA (str:"fizz buzz bar"): some string with a default

    [second_section]
    DEBUG2 (bool:false): debug mode on or off
    AGE2 (int:333): person's age
    SUCCESS2 (float:1.0): how successful in parsing this config from 0 to 1
    NAME2 (str:"guydude"): the person's name
    IDEA2: something with no type or default
    "#;

    /// A config file satisfying [`BASIC_DOCS`], leaving `IDEA` to its default.
    pub const BASIC_SOURCE: &str = "
    [section1]
    DEBUG=true
    AGE=30
    SUCCESS=1
    NAME=joey
    # IDEA=test

    [second_section]
    DEBUG2=true
    IDEA2=fazz bazz
    ";

    /// Null defaults, an optional-only section and multi-line descriptions.
    pub const SIMPLE_DOCS: &str = r#"
    name: simple_app

    # The environment
    {default}

    [main_section]
    HOST (str:"127.0.0.1"): who the server hosts the app to
    PORT (int:8080): the default port, defined as an integer with default 8080
    TIMEOUT (int): this is required because no default was defined
    MILES_PER_HOUR (int:null): this is NOT required and is default None
    DEBUG (bool:false): this is a boolean that is defaulting to False

    # We can continue to define new sections.
    [other_section]
    NAME: this variable has no type defined so it is a "str" and required
    AGE (int): this is an integer that is required. Due to this being required,
        > it will fail if this section doesn't exist. This is also a long
        > multiline description with continued lines specified with ">" prefix.

    [third_section]
    THIRD_SECT_VALUE (str:null): not required, default None
    "#;

    /// Two self-contained environments; `production` needs no config file.
    pub const MULTI_ENV_DOCS: &str = r#"
    name: multi_env_app

    {default}

    [server]
    PORT (int:8080): listening port
    DEBUG (bool:true): debug mode

    {PRODUCTION}

    [server]
    PORT (int:8082): listening port
    HOSTNAME (str:"production.example.org"): public hostname
    DEBUG (bool:false): debug mode
    "#;

    /// Declares `default` and `staging` only.
    pub const STAGING_DOCS: &str = r#"
    name: staging_app

    {default}
    [db]
    URL (str): database url

    {staging}
    [db]
    URL (str:"postgres://staging"): database url
    "#;
}
