use docfield::config::DocstringConfig;
use docfield::Parser;

fn render(content: &str) -> String {
    Parser::new(&DocstringConfig::default())
        .unwrap()
        .render(content)
}

fn render_legacy(content: &str) -> String {
    let config = DocstringConfig {
        legacy_roles: true,
        ..DocstringConfig::default()
    };
    Parser::new(&config).unwrap().render(content)
}

const ARGS: &str = concat!(
    "Args:\n",
    "   arg1 (str):\n",
    "       Description of arg1.\n",
    "\n",
    "   arg2 (foo.bar.abc\n",
    "         .def.ghi,\n",
    "         optional):\n",
    "       Description of arg2.\n",
    "\n",
    "   *args (tuple):\n",
    "       Description of args.\n",
    "\n",
    "   **kwargs (dict):\n",
    "       Description of kwargs.\n",
);

#[test]
fn args_with_wrapped_type() {
    assert_eq!(
        render(ARGS),
        concat!(
            ":param arg1: Description of arg1.\n",
            ":type arg1: :py:class:`str`\n",
            ":param arg2: Description of arg2.\n",
            ":type arg2: :py:class:`foo.bar.abc.def.ghi`, *optional*\n",
            ":param \\*args: Description of args.\n",
            ":type \\*args: :py:class:`tuple`\n",
            ":param \\*\\*kwargs: Description of kwargs.\n",
            ":type \\*\\*kwargs: :py:class:`dict`\n",
        )
    );
}

#[test]
fn args_with_legacy_roles() {
    assert_eq!(
        render_legacy(ARGS),
        concat!(
            ":param arg1: Description of arg1.\n",
            ":type arg1: :class:`str`\n",
            ":param arg2: Description of arg2.\n",
            ":type arg2: :class:`foo.bar.abc.def.ghi`, *optional*\n",
            ":param \\*args: Description of args.\n",
            ":type \\*args: :class:`tuple`\n",
            ":param \\*\\*kwargs: Description of kwargs.\n",
            ":type \\*\\*kwargs: :class:`dict`\n",
        )
    );
}

#[test]
fn context_with_description() {
    assert_eq!(
        render("Context:\n    Description of the context.\n"),
        ":Context: Description of the context.\n"
    );
}

#[test]
fn context_with_bare_word() {
    assert_eq!(render("Context:\n    dict\n"), ":Context: dict\n");
}

#[test]
fn context_with_type_and_description() {
    assert_eq!(
        render("Context:\n    dict:\n    Description of the context.\n"),
        ":Context: :py:class:`dict` -- Description of the context.\n"
    );
}

#[test]
fn deprecated_with_version() {
    assert_eq!(render("Deprecated:\n    2.0\n"), ".. deprecated:: 2.0\n\n");
}

#[test]
fn deprecated_with_version_and_description() {
    assert_eq!(
        render("Deprecated:\n    2.0:\n    Description of the deprecation.\n"),
        ".. deprecated:: 2.0\n\n   Description of the deprecation.\n"
    );
}

const LIST_BODY: &str = concat!(
    "    2.0:\n",
    "    * This is item one and it\n",
    "      wraps across multiple\n",
    "      lines\n",
    "\n",
    "    * And this is item 2.\n",
    "      Still multiple lines.\n",
);

const LIST_RENDERED: &str = concat!(
    "\n",
    "   * This is item one and it\n",
    "     wraps across multiple\n",
    "     lines\n",
    "   \n",
    "   * And this is item 2.\n",
    "     Still multiple lines.\n",
);

#[test]
fn deprecated_with_lists() {
    assert_eq!(
        render(&format!("Deprecated:\n{LIST_BODY}")),
        format!(".. deprecated:: 2.0\n{LIST_RENDERED}")
    );
}

#[test]
fn keys() {
    assert_eq!(
        render(concat!(
            "Keys:\n",
            "    key1 (str):\n",
            "        Description 1\n",
            "\n",
            "    key2 (dict):\n",
            "        Description 2\n",
            "\n",
            "    key3 (int, optional):\n",
            "        Description 3\n",
        )),
        concat!(
            ":Keys: * **key1** (:py:class:`str`) -- Description 1\n",
            "       * **key2** (:py:class:`dict`) -- Description 2\n",
            "       * **key3** (:py:class:`int`, *optional*) -- Description 3\n",
        )
    );
}

#[test]
fn model_attributes() {
    assert_eq!(
        render(concat!(
            "Model Attributes:\n",
            "    attr1 (dict):\n",
            "        Description of attr1\n",
            "\n",
            "    attr2 (foo.bar\n",
            "           .baz):\n",
            "        Description of attr2\n",
        )),
        concat!(
            ":Model Attributes: * **attr1** (:py:class:`dict`) -- Description of attr1\n",
            "                   * **attr2** (:py:class:`foo.bar.baz`) -- Description of attr2\n",
        )
    );
}

#[test]
fn option_args() {
    assert_eq!(
        render(concat!(
            "Option Args:\n",
            "    attr1 (dict):\n",
            "        Description of attr1\n",
            "\n",
            "    attr2 (foo.bar\n",
            "           .baz,\n",
            "           optional):\n",
            "        Description of attr2\n",
        )),
        concat!(
            ":Option Args: * **attr1** (:py:class:`dict`) -- Description of attr1\n",
            "              * **attr2** (:py:class:`foo.bar.baz`, *optional*)",
            " -- Description of attr2\n",
        )
    );
}

#[test]
fn tuple() {
    assert_eq!(
        render(concat!(
            "Tuple:\n",
            "    0 (str):\n",
            "        Description 1\n",
            "\n",
            "    1 (dict):\n",
            "        Description 2\n",
            "\n",
            "    2 (int, optional):\n",
            "        Description 3\n",
        )),
        concat!(
            ":Tuple: * **0** (:py:class:`str`) -- Description 1\n",
            "        * **1** (:py:class:`dict`) -- Description 2\n",
            "        * **2** (:py:class:`int`, *optional*) -- Description 3\n",
        )
    );
}

#[test]
fn type_bare() {
    assert_eq!(render("Type:\n    dict\n"), ":Type: :py:class:`dict`\n");
}

#[test]
fn type_with_description() {
    assert_eq!(
        render("Type:\n    dict:\n    Description.\n"),
        ":Type: :py:class:`dict` -- Description.\n"
    );
}

#[test]
fn version_added_with_version() {
    assert_eq!(render("Version Added:\n    2.0\n"), ".. versionadded:: 2.0\n\n");
}

#[test]
fn version_added_with_description() {
    assert_eq!(
        render("Version Added:\n    2.0:\n    Description of the addition.\n"),
        ".. versionadded:: 2.0\n\n   Description of the addition.\n"
    );
}

#[test]
fn version_added_with_lists() {
    assert_eq!(
        render(&format!("Version Added:\n{LIST_BODY}")),
        format!(".. versionadded:: 2.0\n{LIST_RENDERED}")
    );
}

#[test]
fn version_changed() {
    assert_eq!(
        render("Version Changed:\n    2.0:\n    Description of the change.\n"),
        ".. versionchanged:: 2.0\n\n   Description of the change.\n"
    );
}

#[test]
fn version_changed_with_lists() {
    assert_eq!(
        render(&format!("Version Changed:\n{LIST_BODY}")),
        format!(".. versionchanged:: 2.0\n{LIST_RENDERED}")
    );
}

#[test]
fn full_docstring() {
    let text = concat!(
        "Load a widget.\n",
        "\n",
        "Version Added:\n",
        "    3.1\n",
        "\n",
        "Args:\n",
        "    name (str):\n",
        "        The widget name.\n",
        "\n",
        "Returns:\n",
        "    Widget:\n",
        "    The loaded widget.\n",
        "\n",
        "Raises:\n",
        "    KeyError:\n",
        "        No such widget.\n",
    );
    assert_eq!(
        render(text),
        concat!(
            "Load a widget.\n",
            "\n",
            ".. versionadded:: 3.1\n",
            "\n",
            "\n",
            ":param name: The widget name.\n",
            ":type name: :py:class:`str`\n",
            "\n",
            ":returns: The loaded widget.\n",
            ":rtype: :py:class:`Widget`\n",
            "\n",
            ":raises KeyError: No such widget.\n",
        )
    );
}

#[test]
fn registered_section_after_construction() {
    let mut parser = Parser::new(&DocstringConfig::default()).unwrap();
    parser
        .registry_mut()
        .register_fields_section(&["Side Effects"], "Side Effects")
        .unwrap();
    assert_eq!(
        parser.render("Side Effects:\n    cache (dict):\n        Cleared.\n"),
        ":Side Effects: **cache** (:py:class:`dict`) -- Cleared.\n"
    );
}

#[test]
fn type_aliases_replace_markup() {
    let mut config = DocstringConfig::default();
    config
        .type_aliases
        .insert("Widget".into(), ":py:class:`~app.models.Widget`".into());
    let parser = Parser::new(&config).unwrap();
    assert_eq!(
        parser.render("Type:\n    list of Widget\n"),
        ":Type: :py:class:`list` of :py:class:`~app.models.Widget`\n"
    );
}
