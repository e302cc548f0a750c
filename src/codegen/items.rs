// Declaration emission: the root class, functions, types, modules and usings

use super::context::TranslationContext;
use super::names::to_pascal_case;
use super::Generator;
use crate::parser::ast::*;

/// What an item is declared inside of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Owner {
    /// Root class or a `mod`; everything is static
    Class,
    /// `impl` block
    Type,
    /// `trait` body
    Interface,
    /// Function body
    Local,
}

fn describe_item(item: &Item) -> String {
    match item.unwrapped() {
        Item::Function(function) => format!("fn {}", function.name.as_str()),
        Item::Struct(def) => format!("struct {}", def.name.as_str()),
        Item::Enum(def) => format!("enum {}", def.name.as_str()),
        Item::Trait(def) => format!("trait {}", def.name.as_str()),
        Item::Impl(_) => "impl".to_string(),
        Item::Module(module) => format!("mod {}", module.name.as_str()),
        Item::TypeDecl(decl) => format!("type {}", decl.name.as_str()),
        Item::Static(def) => format!("static {}", def.name.as_str()),
        Item::Const(def) => format!("const {}", def.name.as_str()),
        Item::Use(_) => "use".to_string(),
        Item::ExternCrate(name) => format!("extern crate {}", name.as_str()),
        Item::MacroRules(name) => format!("macro_rules! {}", name.as_str()),
        Item::Documented { .. } | Item::Attributed { .. } => "item".to_string(),
    }
}

/// Crates whose paths have no C# counterpart to import
const STANDARD_CRATES: &[&str] = &["std", "core", "alloc"];

impl Generator {
    pub(crate) fn emit_root(&mut self, file: &SourceFile) {
        let root = self.config.root_class.clone();
        self.out.line(&format!("public static class {}", root));
        let mut context = self.with_context(TranslationContext::Module);
        let mut body = context.braced();
        body.emit_items(&file.items, Owner::Class);
    }

    /// Items separated by blank lines; items that emit nothing leave no gap
    fn emit_items(&mut self, items: &[Item], owner: Owner) {
        let mut emitted_any = false;
        for item in items {
            if emitted_any {
                self.out.request_blank_line();
            }
            let before = self.out.len();
            self.emit_item(item, owner);
            if self.out.len() > before {
                emitted_any = true;
            } else {
                self.out.cancel_blank_line();
            }
        }
        self.out.cancel_blank_line();
    }

    fn emit_item(&mut self, item: &Item, owner: Owner) {
        match item {
            Item::Function(function) => self.emit_function(function, owner),
            Item::Struct(def) => self.emit_struct(def),
            Item::Enum(def) => self.emit_enum(def),
            Item::Trait(def) => self.emit_trait(def),
            Item::Impl(def) => self.emit_impl(def),
            Item::Module(module) => self.emit_module(module),
            Item::TypeDecl(decl) => self.emit_type_alias(decl, owner),
            Item::Static(def) => {
                let ty = self.render_type(&def.ty);
                let name = self.render_member(def.name.as_str());
                self.out.write(&format!("public static {} {} = ", ty, name));
                self.emit_expr(&def.value);
                self.out.line(";");
            }
            Item::Const(def) => self.emit_const(def, owner),
            Item::Use(decl) => self.emit_use(decl),
            Item::ExternCrate(_) | Item::MacroRules(_) => self.gap_statement(describe_item(item)),
            Item::Documented { doc, item } => {
                self.emit_doc(doc);
                self.emit_item(item, owner);
            }
            Item::Attributed { attribute, item } => {
                self.emit_attribute(attribute);
                self.emit_item(item, owner);
            }
        }
    }

    /// Item declared inside a function body
    pub(crate) fn emit_local_item(&mut self, item: &Item) {
        match item {
            Item::Function(function) => self.emit_function(function, Owner::Local),
            Item::Const(def) => self.emit_const(def, Owner::Local),
            Item::Use(decl) => self.emit_use(decl),
            Item::Documented { doc, item } => {
                self.emit_doc(doc);
                self.emit_local_item(item);
            }
            Item::Attributed { attribute, item } => {
                self.emit_attribute(attribute);
                self.emit_local_item(item);
            }
            other => self.gap_statement(format!("local {}", describe_item(other))),
        }
    }

    fn emit_doc(&mut self, doc: &DocComment) {
        for line in doc.text.lines() {
            let line = match doc.style {
                DocStyle::Line => line.trim_end(),
                DocStyle::Block => line.trim().trim_start_matches('*').trim_end(),
            };
            if line.is_empty() {
                self.out.line("///");
            } else if line.starts_with(' ') {
                self.out.line(&format!("///{}", line));
            } else {
                self.out.line(&format!("/// {}", line));
            }
        }
    }

    fn emit_attribute(&mut self, attribute: &Attribute) {
        let bang = if attribute.inner { "!" } else { "" };
        self.out.line(&format!("// #{}[{}]", bang, attribute.text));
    }

    fn emit_function(&mut self, function: &Function, owner: Owner) {
        let mut scope = self.scope();
        let mut function_scope = scope.without_loops();

        let name = function_scope.render_member(function.name.as_str());
        let return_type = if function.returns_unit() {
            "void".to_string()
        } else {
            function_scope.render_type(&function.return_type)
        };
        let generics = function_scope.render_generic_params(&function.generics);
        let where_clauses = function_scope.render_where_clauses(&function.generics);
        let params = function_scope.render_parameters(&function.params);

        let mut modifiers = String::new();
        if owner != Owner::Local {
            modifiers.push_str("public ");
            if function.body.is_none() {
                modifiers.push_str("abstract ");
            }
            if !function.has_receiver() {
                modifiers.push_str("static ");
            }
        }
        let signature = format!(
            "{}{} {}{}({}){}",
            modifiers, return_type, name, generics, params, where_clauses
        );

        let Some(body) = &function.body else {
            function_scope.out.line(&format!("{};", signature));
            return;
        };
        function_scope.out.line(&signature);
        let context = if function.returns_unit() {
            TranslationContext::Block
        } else {
            TranslationContext::Module
        };
        let mut context = function_scope.with_context(context);
        let mut braced = context.braced();
        braced.emit_block_body(body);
    }

    /// Registers parameter names in the current scope
    fn render_parameters(&mut self, params: &[Parameter]) -> String {
        let mut rendered = Vec::with_capacity(params.len());
        for param in params {
            let Parameter::Named { name, ty } = param else {
                continue;
            };
            let ty = match ty {
                Some(ty) => self.render_parameter_type(ty),
                None => "dynamic".to_string(),
            };
            let name = match name {
                Name::Ident(ident) => to_pascal_case(&self.scopes.register(ident)),
                other => self.render_name(other),
            };
            rendered.push(format!("{} {}", ty, name));
        }
        rendered.join(", ")
    }

    /// `&mut T` parameters are passed by reference
    pub(crate) fn render_parameter_type(&self, ty: &Expr) -> String {
        match ty {
            Expr::Ref {
                mutable: true,
                operand,
                ..
            } => format!("ref {}", self.render_type(operand)),
            other => self.render_type(other),
        }
    }

    fn emit_struct(&mut self, def: &Struct) {
        let name = self.render_member(def.name.as_str());
        let generics = self.render_generic_params(&def.generics);
        let where_clauses = self.render_where_clauses(&def.generics);
        self.out
            .line(&format!("public partial class {}{}{}", name, generics, where_clauses));

        let mut typed = self.with_self_type(format!("{}{}", name, generics));
        let mut body = typed.braced();
        for field in &def.fields {
            let ty = body.render_type(&field.ty);
            let member = body.render_field(&field.name);
            body.out.line(&format!("public {} {};", ty, member));
        }
    }

    fn emit_enum(&mut self, def: &Enum) {
        let name = self.render_member(def.name.as_str());
        let generics = self.render_generic_params(&def.generics);
        let where_clauses = self.render_where_clauses(&def.generics);
        let base = format!("{}{}", name, generics);
        self.out
            .line(&format!("public abstract partial class {}{}", base, where_clauses));

        let mut typed = self.with_self_type(base.clone());
        let mut body = typed.braced();
        for (index, variant) in def.variants.iter().enumerate() {
            if index > 0 {
                body.out.request_blank_line();
            }
            let variant_name = body.render_member(variant.name.as_str());
            let header = format!("public class {} : {}", variant_name, base);
            if variant.fields.is_empty() {
                body.out.line(&format!("{} {{ }}", header));
                continue;
            }
            body.out.line(&header);
            let mut fields = body.braced();
            for field in &variant.fields {
                let ty = fields.render_type(&field.ty);
                let member = fields.render_field(&field.name);
                fields.out.line(&format!("public {} {};", ty, member));
            }
        }
    }

    fn emit_trait(&mut self, def: &Trait) {
        let name = self.render_member(def.name.as_str());
        let generics = self.render_generic_params(&def.generics);
        let where_clauses = self.render_where_clauses(&def.generics);
        let supertraits = if def.supertraits.is_empty() {
            String::new()
        } else {
            let bounds: Vec<String> = def.supertraits.iter().map(|bound| self.render_type(bound)).collect();
            format!(" : {}", bounds.join(", "))
        };
        self.out.line(&format!(
            "public interface {}{}{}{}",
            name, generics, supertraits, where_clauses
        ));

        let mut typed = self.with_self_type(format!("{}{}", name, generics));
        let mut body = typed.braced();
        body.emit_items(&def.items, Owner::Interface);
    }

    fn emit_impl(&mut self, def: &Impl) {
        let ty = self.render_type(&def.ty);
        let base = match &def.trait_ref {
            Some(trait_ref) => format!(" : {}", self.render_type(trait_ref)),
            None => String::new(),
        };
        let where_clauses = self.render_where_clauses(&def.generics);
        self.out
            .line(&format!("public partial class {}{}{}", ty, base, where_clauses));

        let mut typed = self.with_self_type(ty);
        let mut body = typed.braced();
        body.emit_items(&def.items, Owner::Type);
    }

    fn emit_module(&mut self, module: &Module) {
        let Some(items) = &module.items else {
            self.gap_statement(format!("mod {};", module.name.as_str()));
            return;
        };
        let name = self.render_member(module.name.as_str());
        self.out.line(&format!("public static class {}", name));
        self.module_path.push(name);
        {
            let mut body = self.braced();
            body.emit_items(items, Owner::Class);
        }
        self.module_path.pop();
    }

    /// Non-generic module-level aliases become file-level `using` lines
    fn emit_type_alias(&mut self, decl: &TypeDecl, owner: Owner) {
        if matches!(owner, Owner::Type | Owner::Interface) {
            self.gap_statement(format!("associated type {}", decl.name.as_str()));
            return;
        }
        let name = self.render_member(decl.name.as_str());
        match &decl.ty {
            Some(ty) if decl.generics.is_empty() => {
                let target = self.render_type(ty);
                self.hoist(format!("using {} = {};", name, target));
            }
            Some(_) => self.gap_statement(format!("generic type alias {}", decl.name.as_str())),
            None => self.gap_statement(format!("associated type {}", decl.name.as_str())),
        }
    }

    fn emit_const(&mut self, def: &Const, owner: Owner) {
        let ty = self.render_type(&def.ty);
        let name = self.render_member(def.name.as_str());
        let Some(value) = &def.value else {
            self.out
                .line(&format!("public abstract {} {} {{ get; }}", ty, name));
            return;
        };

        let visibility = if owner == Owner::Local { "" } else { "public " };
        self.out.write(&format!("{}const {} {} = ", visibility, ty, name));
        self.emit_expr(value);
        self.out.line(";");
    }

    fn emit_use(&mut self, decl: &Use) {
        for path in &decl.paths {
            if let Some(line) = self.render_use_path(path) {
                self.hoist(line);
            }
        }
    }

    /// `a::b::C` → `using C = A.B.C;`, `a::b::*` → `using static A.B;`
    fn render_use_path(&self, path: &UsePath) -> Option<String> {
        if let Some(Name::Ident(root)) = path.segments.first() {
            if STANDARD_CRATES.contains(&root.as_str()) {
                tracing::debug!(root = %root, "standard library import dropped");
                return None;
            }
        }

        // Leading `self`/`super` are relative to the enclosing module class
        let mut segments: Vec<String> = Vec::new();
        let mut rest = path.segments.as_slice();
        if let Some(Name::SelfValue | Name::Super) = rest.first() {
            segments.push(self.config.root_class.clone());
            segments.extend(self.module_path.iter().cloned());
            if let Some((Name::SelfValue, tail)) = rest.split_first() {
                rest = tail;
            }
            while let Some((Name::Super, tail)) = rest.split_first() {
                if segments.len() > 1 {
                    segments.pop();
                }
                rest = tail;
            }
        }
        segments.extend(rest.iter().filter_map(|segment| match segment {
            Name::SelfValue | Name::Super => None,
            Name::Crate => Some(self.config.root_class.clone()),
            Name::Ident(name) => Some(to_pascal_case(name)),
            other => Some(self.render_name(other)),
        }));
        let last = segments.last()?;

        if path.glob {
            return Some(format!("using static {};", segments.join(".")));
        }
        let alias = match &path.alias {
            Some(Name::Underscore) => return None,
            Some(alias) => to_pascal_case(alias.as_str()),
            None if segments.len() == 1 => return None,
            None => last.clone(),
        };
        Some(format!("using {} = {};", alias, segments.join(".")))
    }
}
