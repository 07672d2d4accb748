//! One `Client` method per server endpoint.
//!
//! Resource endpoints are declared as a table through [`bindings!`]; each
//! row names the span, the method, its id arguments and the route. The
//! authentication surface has bespoke status handling and lives in
//! [`users`].
//!
//! Row shapes:
//!
//! | shape    | extra arguments                          | returns        |
//! |----------|------------------------------------------|----------------|
//! | `one`    | `input` when an input type is given      | `T`            |
//! | `page`   | `filter: Option<&QueryFilter>`           | `Page<T>`      |
//! | `search` | `query: &str, filter`                    | `Page<T>`      |
//! | `unit`   | `input` when an input type is given      | `()`           |
//!
//! Route segments are string literals or `{arg: "field"}`, where `field`
//! names the id in errors and on the span.

macro_rules! bindings {
    (@path $acc:expr ;) => { $acc };
    (@path $acc:expr ; $segment:literal $($rest:tt)*) => {
        bindings!(@path $acc.segment($segment) ; $($rest)*)
    };
    (@path $acc:expr ; {$id:ident : $field:literal} $($rest:tt)*) => {
        bindings!(@path $acc.id($field, $id)? ; $($rest)*)
    };

    (@spec $method:ident [$prefix:literal $($segment:tt)*]) => {
        $crate::request::RequestSpec::new(
            ::http::Method::$method,
            bindings!(@path $crate::request::Path::new($prefix) ; $($segment)*),
        )
    };

    (@row [$($attr:tt)*] one $op:ident $name:ident [$($id:ident)*] [$($input:ty)?] [$out:ty]
        $method:ident [$($route:tt)*]) => {
        $($attr)*
        #[doc = ""]
        #[doc = "# Errors"]
        #[doc = "Validation errors before sending; otherwise see [`Error`](crate::Error)."]
        pub async fn $name(
            &self,
            $($id: &str,)*
            $(input: Option<&$input>,)?
        ) -> Result<$out, $crate::Error> {
            self.fetch(stringify!($op), || {
                let spec = bindings!(@spec $method [$($route)*]);
                $(let spec = spec.body($crate::request::required::<$input>(input)?)?;)?
                Ok(spec)
            })
            .await
        }
    };

    (@row [$($attr:tt)*] page $op:ident $name:ident [$($id:ident)*] [] [$out:ty]
        $method:ident [$($route:tt)*]) => {
        $($attr)*
        #[doc = ""]
        #[doc = "# Errors"]
        #[doc = "Validation errors before sending; otherwise see [`Error`](crate::Error)."]
        pub async fn $name(
            &self,
            $($id: &str,)*
            filter: Option<&$crate::QueryFilter>,
        ) -> Result<$crate::Page<$out>, $crate::Error> {
            self.fetch_page(stringify!($op), || {
                Ok(bindings!(@spec $method [$($route)*]).filter(filter))
            })
            .await
        }
    };

    (@row [$($attr:tt)*] search $op:ident $name:ident [$($id:ident)*] [] [$out:ty]
        $method:ident [$($route:tt)*]) => {
        $($attr)*
        #[doc = ""]
        #[doc = "# Errors"]
        #[doc = "Validation errors before sending; otherwise see [`Error`](crate::Error)."]
        pub async fn $name(
            &self,
            $($id: &str,)*
            query: &str,
            filter: Option<&$crate::QueryFilter>,
        ) -> Result<$crate::Page<$out>, $crate::Error> {
            self.fetch_page(stringify!($op), || {
                Ok(bindings!(@spec $method [$($route)*]).search(query)?.filter(filter))
            })
            .await
        }
    };

    (@row [$($attr:tt)*] unit $op:ident $name:ident [$($id:ident)*] [$($input:ty)?] []
        $method:ident [$($route:tt)*]) => {
        $($attr)*
        #[doc = ""]
        #[doc = "# Errors"]
        #[doc = "Validation errors before sending; otherwise see [`Error`](crate::Error)."]
        pub async fn $name(
            &self,
            $($id: &str,)*
            $(input: Option<&$input>,)?
        ) -> Result<(), $crate::Error> {
            self.fetch_unit(stringify!($op), || {
                let spec = bindings!(@spec $method [$($route)*]);
                $(let spec = spec.body($crate::request::required::<$input>(input)?)?;)?
                Ok(spec)
            })
            .await
        }
    };

    ($(
        $(#[$meta:meta])*
        $shape:ident $op:ident => $name:ident($($id:ident),* $(; $input:ty)?) $(-> $out:ty)?
            = $method:ident [$($route:tt)*];
    )*) => {$(
        bindings!(@row [$(#[$meta])*] $shape $op $name [$($id)*] [$($input)?] [$($out)?]
            $method [$($route)*]);
    )*};
}

mod admin;
mod catalog;
mod households;
mod meal_plans;
mod recipes;
mod settings;
mod users;
