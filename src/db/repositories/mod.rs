mod kv_store;
