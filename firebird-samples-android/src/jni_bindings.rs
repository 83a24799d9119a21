//! JNI bindings of `com.example.firebirdandroidcpp.MainActivity`

use jni::objects::{JObject, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use log::warn;
use std::ptr;

use crate::session::{guarded, session};
use crate::{BridgeError, LIB_FBCLIENT};

/// Rethrow as a `java.lang.Exception`
fn throw(env: &mut JNIEnv, e: BridgeError) {
    if let Err(jni_err) = env.throw_new("java/lang/Exception", e.message()) {
        warn!("Could not throw \"{}\": {}", e.message(), jni_err);
    }
}

/// `None` for a `null`
fn java_string(env: &mut JNIEnv, s: &JString) -> Result<Option<String>, BridgeError> {
    if s.is_null() {
        return Ok(None);
    }

    Ok(Some(env.get_string(s)?.into()))
}

/// A `null` database name is an empty one
fn name_or_empty(name: Option<String>) -> String {
    name.unwrap_or_default()
}

/// MainActivity.connect(databaseName: String)
#[no_mangle]
pub extern "system" fn Java_com_example_firebirdandroidcpp_MainActivity_connect(
    mut env: JNIEnv,
    _this: JObject,
    database_name: JString,
) {
    let result = guarded(|| {
        let database_name = name_or_empty(java_string(&mut env, &database_name)?);
        session().connect(LIB_FBCLIENT, &database_name)?;
        Ok(())
    });

    if let Err(e) = result {
        throw(&mut env, e);
    }
}

/// MainActivity.disconnect()
#[no_mangle]
pub extern "system" fn Java_com_example_firebirdandroidcpp_MainActivity_disconnect(
    mut env: JNIEnv,
    _this: JObject,
) {
    if let Err(e) = guarded(|| Ok(session().disconnect()?)) {
        throw(&mut env, e);
    }
}

/// MainActivity.getCurrentTimestamp(): String
#[no_mangle]
pub extern "system" fn Java_com_example_firebirdandroidcpp_MainActivity_getCurrentTimestamp(
    mut env: JNIEnv,
    _this: JObject,
) -> jstring {
    let result = guarded(|| {
        let ts = session().current_timestamp()?;
        Ok(env.new_string(ts)?.into_raw())
    });

    match result {
        Ok(ts) => ts,
        Err(e) => {
            throw(&mut env, e);
            ptr::null_mut()
        }
    }
}
